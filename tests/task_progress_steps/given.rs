//! Given steps for checklist progress scenarios.

use super::world::{ProgressWorld, checklist, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdeck::task::{domain::TaskStatus, services::CreateTaskRequest};

const DUE_DATE: &str = "2030-01-15";

#[given(r#"a new task titled "{title}""#)]
fn new_task(world: &mut ProgressWorld, title: String) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, DUE_DATE);
    let task = run_async(world.service.create_task(world.owner, request))
        .wrap_err("create task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"a new task titled "{title}" with {open:usize} open checklist items"#)]
fn new_task_with_open_items(
    world: &mut ProgressWorld,
    title: String,
    open: usize,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, DUE_DATE).with_checklist(checklist(open, 0));
    let task = run_async(world.service.create_task(world.owner, request))
        .wrap_err("create task with checklist")?;
    world.task = Some(task);
    Ok(())
}

#[given("{pending:usize} pending tasks and {completed:usize} completed task")]
fn pending_and_completed_tasks(
    world: &mut ProgressWorld,
    pending: usize,
    completed: usize,
) -> Result<(), eyre::Report> {
    for index in 0..pending {
        let request = CreateTaskRequest::new(format!("Pending {index}"), DUE_DATE);
        run_async(world.service.create_task(world.owner, request))
            .wrap_err("create pending task")?;
    }
    for index in 0..completed {
        let request = CreateTaskRequest::new(format!("Done {index}"), DUE_DATE);
        let task = run_async(world.service.create_task(world.owner, request))
            .wrap_err("create task to complete")?;
        run_async(
            world
                .service
                .set_status(world.owner, task.id(), TaskStatus::Completed),
        )
        .wrap_err("complete task")?;
    }
    Ok(())
}
