//! Task operations. Visibility is ownership-only; no role opens a foreign
//! task.

use abp_core::{Action, Error, Task, TaskComment, TaskEvent, TaskId, apply_task_event};

use crate::cascade::{self, DeleteTarget};
use crate::ops::{Ctx, authorize};
use crate::scope;
use crate::store::{Committed, Store};

/// Create a task. The actor becomes the creator.
///
/// # Errors
/// Validation failures abort the commit.
pub fn create_task(store: &Store, ctx: Ctx, mut task: Task) -> Result<Committed<Task>, Error> {
    store.mutate(|txn| {
        task.creator = ctx.actor;
        task.created_at = txn.now();
        for assignee in &task.assignees {
            txn.db().user(*assignee)?;
        }
        // Creating is implicitly allowed on the standard channel; the Ews
        // surface still applies.
        authorize(txn.db(), ctx, Action::Write, &scope::task_target(&task))?;
        task.validate().into_result()?;

        txn.db_mut().tasks.insert(task.id, task.clone());
        txn.version_created(&task, Some(ctx.actor));
        Ok(task.clone())
    })
}

/// Finish (or re-finish) a task, recording the actor as finisher.
///
/// # Errors
/// Forbidden unless the actor is the creator or an assignee.
pub fn finish_task(store: &Store, ctx: Ctx, id: TaskId) -> Result<Committed<Task>, Error> {
    transition_task(store, ctx, id, TaskEvent::Finish)
}

/// Reopen a task, clearing finisher and timestamp.
///
/// # Errors
/// Forbidden unless the actor is the creator or an assignee.
pub fn unfinish_task(store: &Store, ctx: Ctx, id: TaskId) -> Result<Committed<Task>, Error> {
    transition_task(store, ctx, id, TaskEvent::Unfinish)
}

fn transition_task(
    store: &Store,
    ctx: Ctx,
    id: TaskId,
    event: TaskEvent,
) -> Result<Committed<Task>, Error> {
    store.mutate(|txn| {
        let before = txn.db().task(id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::task_target(&before))?;

        let mut after = before.clone();
        apply_task_event(&mut after, event, ctx.actor, txn.now())?;

        txn.db_mut().tasks.insert(id, after.clone());
        txn.version_updated(&before, &after, Some(ctx.actor));
        Ok(after)
    })
}

/// Comment on a task the actor participates in.
///
/// # Errors
/// Forbidden for non-participants; validation failures abort the commit.
pub fn add_comment(
    store: &Store,
    ctx: Ctx,
    mut comment: TaskComment,
) -> Result<Committed<TaskComment>, Error> {
    store.mutate(|txn| {
        let task = txn.db().task(comment.task_id)?.clone();
        authorize(txn.db(), ctx, Action::Write, &scope::task_target(&task))?;
        comment.author = ctx.actor;
        comment.created_at = txn.now();
        comment.validate().into_result()?;

        txn.db_mut().task_comments.insert(comment.id, comment.clone());
        txn.version_created(&comment, Some(ctx.actor));
        Ok(comment.clone())
    })
}

/// Delete a task and its comments.
///
/// # Errors
/// Forbidden unless the actor is the creator or an assignee.
pub fn delete_task(store: &Store, ctx: Ctx, id: TaskId) -> Result<Committed<()>, Error> {
    store.mutate(|txn| {
        let task = txn.db().task(id)?.clone();
        authorize(txn.db(), ctx, Action::Destroy, &scope::task_target(&task))?;

        let plan = cascade::plan_delete(txn.db(), DeleteTarget::Task(id), txn.now())?;
        cascade::execute_plan(txn, ctx.actor, &plan)
    })
}
