//! Predicate compilation.

use crate::ast::Predicate;
use alloc::vec::Vec;

/// Compiles optional fragments into one predicate.
///
/// Absent fragments are skipped. No remaining fragment means no restriction
/// and yields `None`; otherwise the result is the conjunction of what is left,
/// always as `Predicate::And` so the shape does not depend on the count.
pub fn compile<I>(fragments: I) -> Option<Predicate>
where
    I: IntoIterator<Item = Option<Predicate>>,
{
    let children: Vec<Predicate> = fragments.into_iter().flatten().collect();
    if children.is_empty() {
        None
    } else {
        Some(Predicate::And(children))
    }
}
