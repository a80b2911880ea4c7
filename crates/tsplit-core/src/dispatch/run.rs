//! Runs a plan's sections as concurrent jobs.
//!
//! Keeps up to `concurrency_limit` jobs running at once; when one finishes,
//! the next section is started until the plan is exhausted. Admission follows
//! plan order, completion order is whatever it is.

use std::future::Future;

use crate::error::{JobError, SplitError};
use crate::event::SplitObserver;
use crate::template::{Plan, Section};

/// Dispatches every section of `plan` through `run_job`, at most
/// `concurrency_limit` in flight at once (a limit of 0 is treated as 1).
///
/// Emits `plan_ready` once up front, then `before_dispatch` immediately
/// before each job starts (the one point where observers may amend section
/// metadata) and `after_dispatch` when a job succeeds. A failing job frees
/// its slot and is recorded; the remaining sections still run. When any
/// jobs failed, the error reported is the first one in plan order, no
/// matter which failure happened first on the clock.
pub async fn dispatch_plan<F, Fut>(
    mut plan: Plan,
    concurrency_limit: usize,
    observer: &mut dyn SplitObserver,
    run_job: F,
) -> Result<Plan, SplitError>
where
    F: Fn(Section, usize) -> Fut,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    observer.on_plan_ready(&plan);
    let limit = concurrency_limit.max(1);

    let mut next = 0usize;
    let mut failures: Vec<(usize, JobError)> = Vec::new();
    let mut join_set: tokio::task::JoinSet<(usize, Result<(), JobError>)> =
        tokio::task::JoinSet::new();

    loop {
        while join_set.len() < limit && next < plan.len() {
            let pos = next;
            next += 1;
            let index = plan.sections()[pos].index;
            observer.on_before_dispatch(&mut plan.sections_mut()[pos], index);
            let job = run_job(plan.sections()[pos].clone(), index);
            join_set.spawn(async move { (pos, job.await) });
        }

        if join_set.is_empty() {
            break;
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        let (pos, outcome) = joined?;
        match outcome {
            Ok(()) => {
                let section = &plan.sections()[pos];
                observer.on_after_dispatch(section, section.index);
            }
            Err(cause) => failures.push((pos, cause)),
        }
    }

    if let Some((pos, cause)) = failures.into_iter().min_by_key(|(pos, _)| *pos) {
        let section = &plan.sections()[pos];
        return Err(SplitError::JobFailed {
            output: section.output_name.clone(),
            index: section.index,
            cause,
        });
    }

    Ok(plan)
}
