//! Top-level split pipeline: acquire the source, plan the template,
//! dispatch one transcode per section.

use std::path::PathBuf;
use std::sync::Arc;

use crate::dispatch::dispatch_plan;
use crate::error::SplitError;
use crate::event::SplitObserver;
use crate::source::{resolve_input, AcquireOptions, MediaProvider, Quality, YtDlpProvider};
use crate::template::{plan_sections, Plan, Section};
use crate::transcoder::{locate_transcoder, run_section, TranscodeOptions};

/// Everything one split run needs.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Local path or URL-like spec of the source media.
    pub input: String,
    /// Template lines, one section per line.
    pub lines: Vec<String>,
    pub output_dir: PathBuf,
    /// Output container/extension.
    pub format: String,
    /// Concurrent transcode processes.
    pub concurrency: usize,
    /// Global metadata pairs applied to every section.
    pub metadata: Vec<(String, String)>,
    pub audio_only: bool,
    pub quality: Quality,
    /// Pass-through transcoder arguments for the input stage.
    pub input_args: Vec<String>,
    /// Pass-through transcoder arguments for the output stage.
    pub output_args: Vec<String>,
    /// Where fetched sources are cached.
    pub cache_dir: PathBuf,
    /// Explicit transcoder path; when None the known locations are searched.
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            input: "input.mp3".to_string(),
            lines: Vec::new(),
            output_dir: PathBuf::from("."),
            format: "mp3".to_string(),
            concurrency: 3,
            metadata: Vec::new(),
            audio_only: false,
            quality: Quality::default(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            cache_dir: std::env::temp_dir(),
            ffmpeg_path: None,
        }
    }
}

/// Drives one full run.
pub struct Splitter {
    opts: SplitOptions,
    provider: Arc<dyn MediaProvider>,
}

impl Splitter {
    pub fn new(opts: SplitOptions) -> Self {
        Self::with_provider(opts, Arc::new(YtDlpProvider::default()))
    }

    /// Uses a caller-supplied provider for remote specs.
    pub fn with_provider(opts: SplitOptions, provider: Arc<dyn MediaProvider>) -> Self {
        Self { opts, provider }
    }

    /// Runs the pipeline: environment checks in front, then source
    /// acquisition, planning, and dispatch. Returns the completed plan.
    pub async fn run(&self, observer: &mut dyn SplitObserver) -> Result<Plan, SplitError> {
        self.check_output_dir()?;

        let explicit = self.opts.ffmpeg_path.clone();
        let program = tokio::task::spawn_blocking(move || locate_transcoder(explicit.as_deref()))
            .await?
            .ok_or(SplitError::ExecutableNotFound)?;
        tracing::debug!("transcoder at {}", program.display());

        let acquire = AcquireOptions {
            audio_only: self.opts.audio_only,
            quality: self.opts.quality,
        };
        let input = resolve_input(
            &self.opts.input,
            &self.opts.cache_dir,
            Arc::clone(&self.provider),
            &acquire,
            observer,
        )
        .await?;

        let plan = plan_sections(&self.opts.lines, &self.opts.format, &self.opts.metadata)?;
        tracing::info!("planned {} sections from template", plan.len());

        let program = Arc::new(program);
        let input = Arc::new(input);
        let output_dir = Arc::new(self.opts.output_dir.clone());
        let transcode = Arc::new(TranscodeOptions {
            input_args: self.opts.input_args.clone(),
            output_args: self.opts.output_args.clone(),
        });

        let run_job = move |section: Section, _index: usize| {
            let program = Arc::clone(&program);
            let input = Arc::clone(&input);
            let output_dir = Arc::clone(&output_dir);
            let transcode = Arc::clone(&transcode);
            async move { run_section(&program, &input, &output_dir, &section, &transcode).await }
        };

        dispatch_plan(plan, self.opts.concurrency, observer, run_job).await
    }

    fn check_output_dir(&self) -> Result<(), SplitError> {
        let dir = &self.opts.output_dir;
        let meta = std::fs::metadata(dir)
            .map_err(|_| SplitError::OutputNotDirectory { path: dir.clone() })?;
        if !meta.is_dir() {
            return Err(SplitError::OutputNotDirectory { path: dir.clone() });
        }
        if meta.permissions().readonly() {
            return Err(SplitError::OutputNotWritable { path: dir.clone() });
        }
        // Mode bits say nothing about ownership; prove writability with a
        // real create. The file is unlinked as soon as it drops.
        if tempfile::tempfile_in(dir).is_err() {
            return Err(SplitError::OutputNotWritable { path: dir.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NullObserver;

    fn options_with_output(dir: PathBuf) -> SplitOptions {
        SplitOptions {
            output_dir: dir,
            ..SplitOptions::default()
        }
    }

    #[test]
    fn accepts_a_writable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let splitter = Splitter::new(options_with_output(dir.path().to_path_buf()));
        assert!(splitter.check_output_dir().is_ok());
    }

    #[test]
    fn writability_check_leaves_no_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let splitter = Splitter::new(options_with_output(dir.path().to_path_buf()));
        assert!(splitter.check_output_dir().is_ok());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn rejects_a_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let splitter = Splitter::new(options_with_output(dir.path().join("absent")));
        assert!(matches!(
            splitter.check_output_dir(),
            Err(SplitError::OutputNotDirectory { .. })
        ));
    }

    #[test]
    fn rejects_a_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        let splitter = Splitter::new(options_with_output(file));
        assert!(matches!(
            splitter.check_output_dir(),
            Err(SplitError::OutputNotDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_a_readonly_directory() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ro");
        std::fs::create_dir(&target).unwrap();
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o555)).unwrap();
        let splitter = Splitter::new(options_with_output(target.clone()));
        assert!(matches!(
            splitter.check_output_dir(),
            Err(SplitError::OutputNotWritable { .. })
        ));
        std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_local_input_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let opts = SplitOptions {
            input: dir.path().join("absent dir").join("in.mp3").display().to_string(),
            lines: vec!["[00:00] only".to_string()],
            output_dir: dir.path().to_path_buf(),
            ffmpeg_path: Some(PathBuf::from("/bin/true")),
            ..SplitOptions::default()
        };
        let err = Splitter::new(opts)
            .run(&mut NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, SplitError::UnreadableInput { .. }));
    }

    #[tokio::test]
    async fn missing_transcoder_aborts_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let opts = SplitOptions {
            input: "in.mp3".to_string(),
            output_dir: dir.path().to_path_buf(),
            ffmpeg_path: Some(PathBuf::from("/nonexistent/transcoder-binary")),
            ..SplitOptions::default()
        };
        let err = Splitter::new(opts)
            .run(&mut NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, SplitError::ExecutableNotFound));
    }
}
