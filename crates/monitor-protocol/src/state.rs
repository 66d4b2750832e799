/// # Port State Machine
///
/// Each port slot is in exactly one of three states:
///
/// ```text
///            device appears              explicit open
///   ┌──────────────┐ ───────────► ┌────────┐ ──────────► ┌──────┐
///   │ Disconnected │              │ Closed │             │ Open │
///   └──────────────┘ ◄─────────── └────────┘ ◄────────── └──────┘
///          ▲          device gone             explicit close │
///          └─────────────────────────────────────────────────┘
///                         device gone while open
/// ```
///
/// Enumeration polls move slots between Disconnected and Closed; explicit
/// open/close requests move them between Closed and Open. The "at most one
/// Open slot" rule belongs to the registry, not to this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PortState {
    /// Device not present on the system
    Disconnected,

    /// Device present, no handle open
    Closed,

    /// Handle open and alive
    Open,
}

impl PortState {
    /// Label shown next to the slot name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
        }
    }

    /// Validate if transition to new_state is allowed from current state
    pub fn can_transition_to(&self, new_state: PortState) -> bool {
        use PortState::*;

        match (self, new_state) {
            (Disconnected, Closed) => true, // Device enumerated
            (Closed, Disconnected) => true, // Device removed
            (Closed, Open) => true,         // Explicit open
            (Open, Closed) => true,         // Explicit close
            (Open, Disconnected) => true,   // Device removed while open

            // Idempotent
            (Disconnected, Disconnected) | (Closed, Closed) | (Open, Open) => true,

            // Cannot open a device that is not there
            (Disconnected, Open) => false,
        }
    }
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
