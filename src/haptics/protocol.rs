//! Actuator wire protocol
//!
//! Every command is an opcode byte followed by a fixed-size payload.
//! Multi-byte fields are little-endian. Angles and pulse counts of -1 mean
//! "leave unchanged".

use thiserror::Error;

use super::signal::Signal;

pub mod opcode {
    pub const PING: u8 = 0x01;
    pub const SET_DIRECTION: u8 = 0x82;
    pub const ADD_SIGNAL: u8 = 0x83;
    pub const PLAY: u8 = 0x84;
    pub const CLEAR: u8 = 0x85;
}

/// Sentinel for angle/pulses fields the device should keep as they are
pub const UNCHANGED: i8 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    SetDirection { angle: i8, speed: u16 },
    AddSignal { angle: i8, pulses: i8, signal: Signal },
    /// true starts playback, false stops it
    Play(bool),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("truncated command {opcode:#04x}: need {needed} bytes, got {got}")]
    Truncated { opcode: u8, needed: usize, got: usize },
    #[error("empty buffer")]
    Empty,
}

impl Command {
    pub fn opcode(&self) -> u8 {
        match self {
            Command::Ping => opcode::PING,
            Command::SetDirection { .. } => opcode::SET_DIRECTION,
            Command::AddSignal { .. } => opcode::ADD_SIGNAL,
            Command::Play(_) => opcode::PLAY,
            Command::Clear => opcode::CLEAR,
        }
    }

    /// Total size on the wire, opcode included
    pub fn encoded_len(&self) -> usize {
        Self::len_for_opcode(self.opcode()).unwrap_or(1)
    }

    fn len_for_opcode(op: u8) -> Option<usize> {
        match op {
            opcode::PING | opcode::CLEAR => Some(1),
            opcode::PLAY => Some(2),
            opcode::SET_DIRECTION => Some(4),
            opcode::ADD_SIGNAL => Some(11),
            _ => None,
        }
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(self.opcode());
        match *self {
            Command::Ping | Command::Clear => {}
            Command::SetDirection { angle, speed } => {
                buf.push(angle as u8);
                buf.extend_from_slice(&speed.to_le_bytes());
            }
            Command::AddSignal {
                angle,
                pulses,
                signal,
            } => {
                buf.push(angle as u8);
                buf.push(pulses as u8);
                buf.push(signal.signal_type);
                buf.push(signal.amplitude);
                buf.push(signal.offset);
                buf.push(signal.duty);
                buf.extend_from_slice(&signal.period.to_le_bytes());
                buf.extend_from_slice(&signal.phase.to_le_bytes());
            }
            Command::Play(play) => buf.push(u8::from(play)),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Decode one command from the front of `bytes`, returning it with the bytes consumed
    pub fn decode(bytes: &[u8]) -> Result<(Command, usize), ProtocolError> {
        let &op = bytes.first().ok_or(ProtocolError::Empty)?;
        let needed = Self::len_for_opcode(op).ok_or(ProtocolError::UnknownOpcode(op))?;
        if bytes.len() < needed {
            return Err(ProtocolError::Truncated {
                opcode: op,
                needed,
                got: bytes.len(),
            });
        }

        let b = &bytes[..needed];
        let command = match op {
            opcode::PING => Command::Ping,
            opcode::CLEAR => Command::Clear,
            opcode::PLAY => Command::Play(b[1] != 0),
            opcode::SET_DIRECTION => Command::SetDirection {
                angle: b[1] as i8,
                speed: u16::from_le_bytes([b[2], b[3]]),
            },
            _ => Command::AddSignal {
                angle: b[1] as i8,
                pulses: b[2] as i8,
                signal: Signal {
                    signal_type: b[3],
                    amplitude: b[4],
                    offset: b[5],
                    duty: b[6],
                    period: u16::from_le_bytes([b[7], b[8]]),
                    phase: u16::from_le_bytes([b[9], b[10]]),
                },
            },
        };
        Ok((command, needed))
    }

    /// Decode a whole byte stream into commands
    pub fn decode_all(mut bytes: &[u8]) -> Result<Vec<Command>, ProtocolError> {
        let mut commands = Vec::new();
        while !bytes.is_empty() {
            let (command, used) = Self::decode(bytes)?;
            commands.push(command);
            bytes = &bytes[used..];
        }
        Ok(commands)
    }
}
