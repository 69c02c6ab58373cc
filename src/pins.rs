//! GPIO / peripheral pin assignments for the HALMET board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay outputs (windlass contactor drive)
// ---------------------------------------------------------------------------

/// Digital output: HIGH energizes the "go up" relay.
pub const RELAY_UP_GPIO: i32 = 17;
/// Digital output: HIGH energizes the "go down" relay.
pub const RELAY_DOWN_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Opto-isolated digital inputs
// ---------------------------------------------------------------------------

/// D1 — chain counter pulse (gypsy magnet / reed switch). One rising
/// edge per pocket of chain travel.
pub const CHAIN_PULSE_GPIO: i32 = 23;
/// D2 — "going up" sensor, HIGH while the windlass up-circuit is live.
pub const GOING_UP_GPIO: i32 = 25;
/// D3 — "going down" sensor, HIGH while the windlass down-circuit is live.
pub const GOING_DOWN_GPIO: i32 = 27;
