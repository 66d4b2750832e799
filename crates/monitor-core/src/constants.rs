//! Centralized configuration constants for the monitor
//!
//! These are the defaults behind [`crate::config::MonitorConfig`]; a config
//! file or CLI flag may override most of them.

/// Port slots and serial parameters
pub mod port {
    /// Slot names offered when no slot list is configured
    ///
    /// **Value**: `COM1`..`COM8`
    ///
    /// Slots are fixed so the list does not reshuffle while devices come and
    /// go; a slot whose device is missing is shown as disconnected.
    pub const DEFAULT_SLOTS: [&str; 8] = [
        "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    ];

    /// Baud rate used until the user picks another
    pub const DEFAULT_BAUD_RATE: u32 = 9600;

    /// Blocking read timeout (milliseconds)
    ///
    /// **Value**: 100ms
    ///
    /// Reads are only issued for bytes the driver already reports as pending,
    /// so the timeout bounds the worst case of a driver that over-reports.
    pub const READ_TIMEOUT_MS: u64 = 100;
}

/// Timer periods
pub mod poll {
    /// Device enumeration period (milliseconds)
    ///
    /// **Value**: 500ms
    ///
    /// Enumeration walks the OS device tables; twice a second is enough for a
    /// plug/unplug to feel immediate.
    pub const PORT_SCAN_INTERVAL_MS: u64 = 500;

    /// Receive poll period (milliseconds)
    ///
    /// **Value**: 10ms
    ///
    /// At 115200 baud roughly 115 bytes arrive per tick, so a session rarely
    /// spans more than 8 dump lines.
    pub const RECEIVE_INTERVAL_MS: u64 = 10;

    /// Largest single read within one receive tick
    pub const RECEIVE_CHUNK: usize = 2048;

    /// Upper bound on reads per receive tick
    ///
    /// A device that streams faster than we drain would otherwise keep one
    /// tick busy forever.
    pub const MAX_READS_PER_TICK: usize = 64;
}

/// Send buffer
pub mod sender {
    /// Payloads remembered for up/down recall
    pub const HISTORY_CAPACITY: usize = 100;

    /// Byte appended when "append newline" is on
    pub const NEWLINE: u8 = 0x0A;

    pub const EMPTY_PLACEHOLDER_HEX: &str = "Enter bytes to send like \"48656c6c6f2121\"";
    pub const EMPTY_PLACEHOLDER_TEXT: &str = "Enter text to send like \"Hello!!\"";
    pub const MALFORMED_BYTES: &str = "(MALFORMED BYTES)";
    pub const FAILED_TO_DECODE: &str = "(FAILED TO DECODE BYTES)";
    pub const FAILED_TO_ENCODE: &str = "(FAILED TO ENCODE TEXT)";
}
