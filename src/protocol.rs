//! 3270 inbound message processing
//!
//! The outer layer of the decoder: one inbound message is a command byte, a
//! Write Control Character for the write-class commands, and then the order
//! stream. [`DatastreamProcessor`] drives the order parser against a screen
//! buffer and implements the WCC side effects (keyboard lock/restore, alarm,
//! MDT reset).
//!
//! Read-class commands ask the terminal to transmit; they belong to the input
//! side of the protocol and are reported as unsupported here.

use log::debug;

use crate::addressing::AddressingMode;
use crate::codes::{CommandCode, WCC_ALARM, WCC_RESET, WCC_RESET_MDT, WCC_RESTORE};
use crate::error::DatastreamError;
use crate::order::OrderStreamParser;
use crate::screen::ScreenBuffer;

/// Applies inbound datastream messages to a screen buffer
///
/// Holds the per-session addressing mode, fixed at session setup. One
/// processor serves one session; independent sessions each own their own.
#[derive(Debug, Clone, Copy)]
pub struct DatastreamProcessor {
    addressing: AddressingMode,
}

impl DatastreamProcessor {
    pub fn new(addressing: AddressingMode) -> Self {
        Self { addressing }
    }

    pub fn addressing(&self) -> AddressingMode {
        self.addressing
    }

    /// Apply one complete inbound message to the screen
    ///
    /// On error the screen is left at its last fully-applied order and the
    /// error, carrying the offset into `data`, is surfaced to the caller; the
    /// transport layer decides whether to drop the session.
    pub fn apply_message(
        &self,
        data: &[u8],
        screen: &mut ScreenBuffer,
    ) -> Result<(), DatastreamError> {
        let Some(&command_byte) = data.first() else {
            return Ok(());
        };
        let command =
            CommandCode::from_u8(command_byte).ok_or(DatastreamError::UnsupportedOpcode {
                offset: 0,
                opcode: command_byte,
            })?;
        debug!("inbound {command:?} message, {} bytes", data.len());

        if command == CommandCode::EraseAllUnprotected {
            screen.erase_all_unprotected();
            screen.unlock_keyboard();
            return Ok(());
        }

        // keyboard locks at the start of every write and stays locked unless
        // the WCC restore bit releases it
        screen.lock_keyboard();

        let Some(&wcc) = data.get(1) else {
            return Err(DatastreamError::TruncatedStream {
                offset: 1,
                expected: 1,
                remaining: 0,
            });
        };

        if command.erases() {
            screen.clear();
        }
        if (wcc & (WCC_RESET | WCC_RESET_MDT)) != 0 {
            screen.reset_mdt();
        }
        if (wcc & WCC_ALARM) != 0 {
            screen.set_alarm(true);
        }
        if (wcc & WCC_RESTORE) != 0 {
            screen.unlock_keyboard();
        }

        let mut parser =
            OrderStreamParser::new(&data[2..], self.addressing, screen.buffer_size());
        screen
            .apply_orders(&mut parser)
            .map_err(|e| e.rebased(2))
    }
}
