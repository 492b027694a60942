//! Then steps for checklist progress scenarios.

use super::world::ProgressWorld;
use rstest_bdd_macros::then;

#[then("the task progress is {progress:u8}")]
fn progress_is(world: &ProgressWorld, progress: u8) -> Result<(), eyre::Report> {
    let actual = world.current_task()?.progress().value();
    if actual != progress {
        return Err(eyre::eyre!("expected progress {progress}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the task status is "{status}""#)]
fn status_is(world: &ProgressWorld, status: String) -> Result<(), eyre::Report> {
    let actual = world.current_task()?.status();
    if actual.as_str() != status {
        return Err(eyre::eyre!("expected status {status}, found {actual}"));
    }
    Ok(())
}

#[then("every checklist item is completed")]
fn every_item_completed(world: &ProgressWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    if task.checklist().is_empty() {
        return Err(eyre::eyre!("expected a non-empty checklist"));
    }
    if let Some(open) = task.checklist().iter().find(|item| !item.completed) {
        return Err(eyre::eyre!("checklist item '{}' is still open", open.title));
    }
    Ok(())
}

#[then(r#"{count:usize} tasks are returned with status "{status}""#)]
fn filtered_tasks_returned(
    world: &ProgressWorld,
    count: usize,
    status: String,
) -> Result<(), eyre::Report> {
    let listing = world
        .listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    if listing.tasks.len() != count {
        return Err(eyre::eyre!(
            "expected {count} tasks, found {}",
            listing.tasks.len()
        ));
    }
    if let Some(other) = listing
        .tasks
        .iter()
        .find(|task| task.status().as_str() != status)
    {
        return Err(eyre::eyre!(
            "task '{}' has status {}",
            other.title().as_str(),
            other.status()
        ));
    }
    Ok(())
}

#[then("the summary counts {total:u64} tasks in total")]
fn summary_total(world: &ProgressWorld, total: u64) -> Result<(), eyre::Report> {
    let listing = world
        .listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing in scenario world"))?;
    let actual = listing.summary.total();
    if actual != total {
        return Err(eyre::eyre!("expected summary total {total}, found {actual}"));
    }
    Ok(())
}

#[then("the toggles reported pinned then unpinned")]
fn toggles_alternate(world: &ProgressWorld) -> Result<(), eyre::Report> {
    if world.pin_results != [true, false] {
        return Err(eyre::eyre!(
            "expected toggles [true, false], found {:?}",
            world.pin_results
        ));
    }
    Ok(())
}

#[then("the task is not pinned")]
fn task_not_pinned(world: &ProgressWorld) -> Result<(), eyre::Report> {
    if world.current_task()?.is_pinned() {
        return Err(eyre::eyre!("expected the task to be unpinned"));
    }
    Ok(())
}
