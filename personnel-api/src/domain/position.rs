pub type PositionId = i64;

/// A job title referenced by employees through `Employee::position_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPosition {
    pub name: String,
    pub description: Option<String>,
}
