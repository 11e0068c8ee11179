//! Task tree reconciliation.
//!
//! A project update carries three lists: tasks to rewrite, tasks to add, and
//! tasks to delete. [`plan`] turns those lists plus the project's current task
//! ids into a [`ReconcilePlan`] that the store applies in a fixed order:
//!
//! 1. rewrite every listed task that still exists (description replaced,
//!    sub-task list replaced wholesale),
//! 2. insert every added task with its sub-tasks,
//! 3. delete every listed task that still exists.
//!
//! A listed id that is not one of the project's tasks is skipped, never an
//! error. The passes are independent set operations; [`check_disjoint`]
//! rejects a payload that names the same task for both rewrite and delete.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::{validate_sub_task_text, validate_task_text};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Reference to a task inside an update payload.
///
/// Clients send either the persisted numeric id or a client-local string
/// handle. A string that parses as an integer is treated as that id; any
/// other string cannot name a persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Id(DbId),
    Local(String),
}

impl TaskRef {
    /// The persisted id this reference names, if it can name one.
    pub fn resolve(&self) -> Option<DbId> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Local(raw) => raw.trim().parse().ok(),
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Local(raw) => f.write_str(raw),
        }
    }
}

/// A new task with its sub-task checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub description: String,
    #[serde(default)]
    pub sub_tasks: Vec<String>,
}

/// Replacement content for an existing task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRevision {
    pub idx: TaskRef,
    pub description: String,
    #[serde(default)]
    pub sub_tasks: Vec<String>,
}

/// The task-tree part of a project update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    #[serde(default)]
    pub updated_tasks: Vec<TaskRevision>,
    #[serde(default)]
    pub added_tasks: Vec<TaskDraft>,
    #[serde(default)]
    pub deleted_tasks: Vec<TaskRef>,
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Which pass skipped an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePass {
    Update,
    Delete,
}

/// A payload entry that named no task of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTask {
    pub pass: ReconcilePass,
    pub idx: TaskRef,
}

/// New description and sub-task list for one persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRewrite {
    pub task_id: DbId,
    pub description: String,
    pub sub_tasks: Vec<String>,
}

/// The writes one update applies, in pass order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub rewrites: Vec<TaskRewrite>,
    pub additions: Vec<TaskDraft>,
    pub deletions: Vec<DbId>,
    pub skipped: Vec<SkippedTask>,
}

impl ReconcilePlan {
    /// Whether applying the plan writes nothing.
    pub fn is_noop(&self) -> bool {
        self.rewrites.is_empty() && self.additions.is_empty() && self.deletions.is_empty()
    }
}

/// What an applied plan did, reported back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub updated: Vec<DbId>,
    pub added: Vec<DbId>,
    pub deleted: Vec<DbId>,
    pub skipped: Vec<SkippedTask>,
}

/// Reject a payload that lists the same task id for both rewrite and delete.
///
/// The passes run independently, so an overlapping id would be rewritten and
/// then deleted. That is never what a client means.
pub fn check_disjoint(changes: &TaskChanges) -> Result<(), CoreError> {
    let updated: HashSet<DbId> = changes
        .updated_tasks
        .iter()
        .filter_map(|rev| rev.idx.resolve())
        .collect();

    let mut overlap: Vec<DbId> = changes
        .deleted_tasks
        .iter()
        .filter_map(TaskRef::resolve)
        .filter(|id| updated.contains(id))
        .collect();

    if overlap.is_empty() {
        return Ok(());
    }
    overlap.sort_unstable();
    overlap.dedup();
    let ids: Vec<String> = overlap.iter().map(ToString::to_string).collect();
    Err(CoreError::Conflict(format!(
        "Tasks listed for both update and delete: {}",
        ids.join(", ")
    )))
}

/// Validate the text content of rewritten and added tasks.
pub fn validate_changes(changes: &TaskChanges) -> Result<(), CoreError> {
    for rev in &changes.updated_tasks {
        validate_task_text(&rev.description)?;
        rev.sub_tasks
            .iter()
            .try_for_each(|line| validate_sub_task_text(line))?;
    }
    for draft in &changes.added_tasks {
        validate_draft(draft)?;
    }
    Ok(())
}

/// Validate one new task and its checklist.
pub fn validate_draft(draft: &TaskDraft) -> Result<(), CoreError> {
    validate_task_text(&draft.description)?;
    draft
        .sub_tasks
        .iter()
        .try_for_each(|line| validate_sub_task_text(line))
}

/// Build the plan for `changes` against the project's current task ids.
pub fn plan(existing: &HashSet<DbId>, changes: &TaskChanges) -> ReconcilePlan {
    let mut out = ReconcilePlan::default();

    for rev in &changes.updated_tasks {
        match rev.idx.resolve().filter(|id| existing.contains(id)) {
            Some(task_id) => out.rewrites.push(TaskRewrite {
                task_id,
                description: rev.description.clone(),
                sub_tasks: rev.sub_tasks.clone(),
            }),
            None => out.skipped.push(SkippedTask {
                pass: ReconcilePass::Update,
                idx: rev.idx.clone(),
            }),
        }
    }

    out.additions = changes.added_tasks.clone();

    let mut queued = HashSet::new();
    for idx in &changes.deleted_tasks {
        match idx.resolve().filter(|id| existing.contains(id)) {
            Some(task_id) => {
                // A repeated id is deleted once; the repeat is not a skip.
                if queued.insert(task_id) {
                    out.deletions.push(task_id);
                }
            }
            None => out.skipped.push(SkippedTask {
                pass: ReconcilePass::Delete,
                idx: idx.clone(),
            }),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use assert_matches::assert_matches;

    use super::*;

    fn rev(idx: TaskRef, description: &str, subs: &[&str]) -> TaskRevision {
        TaskRevision {
            idx,
            description: description.to_string(),
            sub_tasks: subs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn draft(description: &str, subs: &[&str]) -> TaskDraft {
        TaskDraft {
            description: description.to_string(),
            sub_tasks: subs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn ids(values: &[DbId]) -> HashSet<DbId> {
        values.iter().copied().collect()
    }

    /// Apply a plan to an in-memory tree the way the store does, handing out
    /// fresh ids from `next_id` for additions.
    fn apply(
        tree: &mut BTreeMap<DbId, (String, Vec<String>)>,
        plan: &ReconcilePlan,
        mut next_id: DbId,
    ) {
        for rw in &plan.rewrites {
            tree.insert(rw.task_id, (rw.description.clone(), rw.sub_tasks.clone()));
        }
        for add in &plan.additions {
            tree.insert(next_id, (add.description.clone(), add.sub_tasks.clone()));
            next_id += 1;
        }
        for id in &plan.deletions {
            tree.remove(id);
        }
    }

    // -- TaskRef -------------------------------------------------------------

    #[test]
    fn task_ref_resolves_numbers_and_numeric_strings() {
        assert_eq!(TaskRef::Id(4).resolve(), Some(4));
        assert_eq!(TaskRef::Local("12".into()).resolve(), Some(12));
        assert_eq!(TaskRef::Local(" 7 ".into()).resolve(), Some(7));
        assert_eq!(TaskRef::Local("new-1".into()).resolve(), None);
        assert_eq!(TaskRef::Local(String::new()).resolve(), None);
    }

    #[test]
    fn task_ref_deserializes_from_number_or_string() {
        let parsed: Vec<TaskRef> = serde_json::from_str(r#"[3, "4", "tmp-a"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                TaskRef::Id(3),
                TaskRef::Local("4".into()),
                TaskRef::Local("tmp-a".into())
            ]
        );
    }

    #[test]
    fn changes_default_missing_lists() {
        let changes: TaskChanges = serde_json::from_str(r#"{"deleted_tasks": [1]}"#).unwrap();
        assert!(changes.updated_tasks.is_empty());
        assert!(changes.added_tasks.is_empty());
        assert_eq!(changes.deleted_tasks, vec![TaskRef::Id(1)]);
    }

    // -- plan ----------------------------------------------------------------

    #[test]
    fn passes_are_planned_in_order() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(1), "Design v2", &["sketch", "review"])],
            added_tasks: vec![draft("Ship", &["tag release"])],
            deleted_tasks: vec![TaskRef::Id(2)],
        };
        let plan = plan(&ids(&[1, 2, 3]), &changes);

        assert_eq!(
            plan.rewrites,
            vec![TaskRewrite {
                task_id: 1,
                description: "Design v2".into(),
                sub_tasks: vec!["sketch".into(), "review".into()],
            }]
        );
        assert_eq!(plan.additions, vec![draft("Ship", &["tag release"])]);
        assert_eq!(plan.deletions, vec![2]);
        assert!(plan.skipped.is_empty());
        assert!(!plan.is_noop());
    }

    #[test]
    fn missing_update_target_is_skipped() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(99), "Gone", &[])],
            ..TaskChanges::default()
        };
        let plan = plan(&ids(&[1]), &changes);
        assert!(plan.rewrites.is_empty());
        assert_eq!(
            plan.skipped,
            vec![SkippedTask {
                pass: ReconcilePass::Update,
                idx: TaskRef::Id(99)
            }]
        );
        assert!(plan.is_noop());
    }

    #[test]
    fn non_numeric_local_ids_never_match() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Local("draft-1".into()), "x", &[])],
            deleted_tasks: vec![TaskRef::Local("draft-2".into())],
            ..TaskChanges::default()
        };
        let plan = plan(&ids(&[1, 2]), &changes);
        assert!(plan.is_noop());
        assert_eq!(plan.skipped.len(), 2);
        assert_eq!(plan.skipped[1].pass, ReconcilePass::Delete);
    }

    #[test]
    fn task_of_another_project_is_treated_as_missing() {
        let changes = TaskChanges {
            deleted_tasks: vec![TaskRef::Id(50)],
            ..TaskChanges::default()
        };
        let plan = plan(&ids(&[1, 2]), &changes);
        assert!(plan.deletions.is_empty());
        assert_eq!(plan.skipped.len(), 1);
    }

    #[test]
    fn repeated_delete_is_planned_once() {
        let changes = TaskChanges {
            deleted_tasks: vec![TaskRef::Id(2), TaskRef::Local("2".into())],
            ..TaskChanges::default()
        };
        let plan = plan(&ids(&[2]), &changes);
        assert_eq!(plan.deletions, vec![2]);
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn empty_sub_task_list_clears_checklist() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(1), "Keep", &[])],
            ..TaskChanges::default()
        };
        let plan = plan(&ids(&[1]), &changes);
        assert_eq!(plan.rewrites[0].sub_tasks, Vec::<String>::new());
    }

    #[test]
    fn resulting_tree_is_original_minus_deleted_plus_added() {
        let mut tree: BTreeMap<DbId, (String, Vec<String>)> = BTreeMap::new();
        tree.insert(1, ("A".into(), vec!["a1".into()]));
        tree.insert(2, ("B".into(), vec!["b1".into(), "b2".into()]));
        tree.insert(3, ("C".into(), vec![]));
        tree.insert(4, ("D".into(), vec!["d1".into()]));
        let existing: HashSet<DbId> = tree.keys().copied().collect();

        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(1), "A2", &["x", "y"])],
            added_tasks: vec![draft("E", &["e1"]), draft("F", &[])],
            deleted_tasks: vec![TaskRef::Id(3), TaskRef::Id(77)],
        };
        check_disjoint(&changes).unwrap();
        let plan = plan(&existing, &changes);
        apply(&mut tree, &plan, 100);

        let keys: Vec<DbId> = tree.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 4, 100, 101]);
        assert_eq!(tree[&1], ("A2".into(), vec!["x".into(), "y".into()]));
        // Untouched entries are unchanged.
        assert_eq!(tree[&2], ("B".into(), vec!["b1".into(), "b2".into()]));
        assert_eq!(tree[&4], ("D".into(), vec!["d1".into()]));
        assert_eq!(tree[&100], ("E".into(), vec!["e1".into()]));
        assert_eq!(tree[&101], ("F".into(), vec![]));
    }

    // -- check_disjoint ------------------------------------------------------

    #[test]
    fn overlapping_update_and_delete_is_a_conflict() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(5), "x", &[]), rev(TaskRef::Id(6), "y", &[])],
            deleted_tasks: vec![TaskRef::Local("6".into()), TaskRef::Id(5), TaskRef::Id(9)],
            ..TaskChanges::default()
        };
        let err = check_disjoint(&changes).unwrap_err();
        assert_matches!(&err, CoreError::Conflict(msg) if msg.ends_with("5, 6"));
    }

    #[test]
    fn disjoint_lists_pass() {
        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(5), "x", &[])],
            deleted_tasks: vec![TaskRef::Id(6), TaskRef::Local("tmp".into())],
            ..TaskChanges::default()
        };
        assert!(check_disjoint(&changes).is_ok());
    }

    // -- validate_changes ----------------------------------------------------

    #[test]
    fn blank_descriptions_are_rejected() {
        let changes = TaskChanges {
            added_tasks: vec![draft("  ", &["a"])],
            ..TaskChanges::default()
        };
        assert_matches!(validate_changes(&changes), Err(CoreError::Validation(_)));

        let changes = TaskChanges {
            updated_tasks: vec![rev(TaskRef::Id(1), "", &[])],
            ..TaskChanges::default()
        };
        assert_matches!(validate_changes(&changes), Err(CoreError::Validation(_)));
    }

    #[test]
    fn overlong_sub_task_is_rejected() {
        let long = "s".repeat(crate::project::MAX_TASK_TEXT_LENGTH + 1);
        let changes = TaskChanges {
            added_tasks: vec![draft("ok", &[long.as_str()])],
            ..TaskChanges::default()
        };
        assert!(validate_changes(&changes).is_err());
    }
}
