//! When steps for checklist progress scenarios.

use super::world::{ProgressWorld, checklist, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskdeck::task::domain::TaskStatus;

#[when("the checklist is replaced with {total:usize} items of which {done:usize} are completed")]
fn replace_checklist(world: &mut ProgressWorld, total: usize, done: usize) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let task = run_async(
        world
            .service
            .set_checklist(world.owner, id, checklist(total, done)),
    )
    .wrap_err("replace checklist")?;
    world.task = Some(task);
    Ok(())
}

#[when(r#"the task status is set to "{status}""#)]
fn set_status(world: &mut ProgressWorld, status: String) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let status: TaskStatus = status.parse().wrap_err("parse status label")?;
    let task = run_async(world.service.set_status(world.owner, id, status))
        .wrap_err("set status")?;
    world.task = Some(task);
    Ok(())
}

#[when(r#"the tasks are listed with status "{status}""#)]
fn list_by_status(world: &mut ProgressWorld, status: String) -> Result<(), eyre::Report> {
    let status: TaskStatus = status.parse().wrap_err("parse status label")?;
    let listing = run_async(world.service.list_tasks(world.owner, Some(status)))
        .wrap_err("list tasks")?;
    world.listing = Some(listing);
    Ok(())
}

#[when("the pin is toggled")]
fn toggle_pin(world: &mut ProgressWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let (task, pinned) = run_async(world.service.toggle_pinned(world.owner, id))
        .wrap_err("toggle pin")?;
    world.task = Some(task);
    world.pin_results.push(pinned);
    Ok(())
}
