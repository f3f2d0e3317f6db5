use knowcode_model::{SectionKind, TaskType};

/// Section priority order per task_type (spec §4.11), highest first.
pub fn section_priority(task_type: TaskType) -> &'static [SectionKind] {
    use SectionKind::*;
    match task_type {
        TaskType::Explain => &[Signature, Docstring, Source, Callers, Callees, Inherits],
        TaskType::Debug => &[Source, Callers, RecentChanges, Callees],
        TaskType::Extend => &[Signature, Source, Callers, Inherits, Imports],
        TaskType::Review => &[Source, Callers, Callees, RecentChanges, Impact],
        TaskType::Locate => &[Header, Signature, Docstring],
        TaskType::General | TaskType::Auto => &[Signature, Docstring, Source, Callers, Callees],
    }
}
