// =============================================================================
// Web layer — REST endpoints and the progress WebSocket
// =============================================================================

pub mod rest;
pub mod ws;
