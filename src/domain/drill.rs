// Drill-down context carried from one view into another
use super::view::ViewRef;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillContext {
    pub entity_id: String,
    pub origin: ViewRef,
    pub target: ViewRef,
}
