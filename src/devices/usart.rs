//! Line-buffered serial link.

use crate::builder::{guarded_transition, BuildError};
use crate::core::{Fsm, State, TransitionTable};
use crate::hw::{SerialLink, EMPTY_BYTE, USART_INPUT_BUFFER_LEN, USART_OUTPUT_BUFFER_LEN};
use crate::state_enum;
use std::sync::{Arc, OnceLock};
use tracing::warn;

state_enum! {
    /// Transfer states of a serial link.
    pub enum UsartState {
        WaitData,
        SendData,
    }
    idle: [WaitData]
}

/// Polls of the transmit-ready flag before a write is forced.
const TX_READY_POLLS: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct UsartData {
    id: usize,
    in_data: [u8; USART_INPUT_BUFFER_LEN],
    out_data: [u8; USART_OUTPUT_BUFFER_LEN],
    data_received: bool,
}

pub struct UsartIo {
    link: Arc<dyn SerialLink>,
}

type UsartTable = TransitionTable<UsartState, UsartData, UsartIo>;

fn get_data_rx(usart: &mut UsartData, io: &mut UsartIo) {
    io.link.read_input(usart.id, &mut usart.in_data);
    io.link.reset_input(usart.id);
    usart.data_received = true;
}

fn set_data_tx(usart: &mut UsartData, io: &mut UsartIo) {
    io.link.reset_output(usart.id);
    io.link.write_output(usart.id, &usart.out_data);

    if !(0..TX_READY_POLLS).any(|_| io.link.tx_ready(usart.id)) {
        warn!(usart = usart.id, "transmitter not ready, writing anyway");
    }
    io.link.start_write(usart.id);
    io.link.enable_tx_interrupt(usart.id);
}

fn tx_end(usart: &mut UsartData, io: &mut UsartIo) {
    io.link.reset_output(usart.id);
    usart.out_data.fill(EMPTY_BYTE);
}

fn build_table() -> Result<UsartTable, BuildError> {
    use UsartState::*;

    TransitionTable::new(
        "usart",
        vec![
            guarded_transition(WaitData, WaitData, |u: &UsartData, io: &UsartIo| {
                io.link.rx_done(u.id)
            })
            .with_action(get_data_rx),
            guarded_transition(WaitData, SendData, |u: &UsartData, _: &UsartIo| {
                u.out_data[0] != EMPTY_BYTE
            })
            .with_action(set_data_tx),
            guarded_transition(SendData, WaitData, |u: &UsartData, io: &UsartIo| {
                io.link.tx_done(u.id)
            })
            .with_action(tx_end),
        ],
    )
}

fn table() -> Arc<UsartTable> {
    static TABLE: OnceLock<Arc<UsartTable>> = OnceLock::new();
    TABLE
        .get_or_init(|| Arc::new(build_table().expect("usart table is well formed")))
        .clone()
}

/// Serial link machine.
///
/// Received lines land in a fixed 10-byte input buffer and outgoing lines
/// go through a fixed 100-byte output buffer. Longer data is truncated.
pub struct UsartFsm {
    fsm: Fsm<UsartState, UsartData, UsartIo>,
    data: UsartData,
    io: UsartIo,
}

impl UsartFsm {
    pub fn new(id: usize, link: Arc<dyn SerialLink>) -> Self {
        link.reset_input(id);
        link.reset_output(id);

        Self {
            fsm: Fsm::new(table()),
            data: UsartData {
                id,
                in_data: [EMPTY_BYTE; USART_INPUT_BUFFER_LEN],
                out_data: [EMPTY_BYTE; USART_OUTPUT_BUFFER_LEN],
                data_received: false,
            },
            io: UsartIo { link },
        }
    }

    pub fn fire(&mut self) -> Option<UsartState> {
        self.fsm.fire(&mut self.data, &mut self.io)
    }

    pub fn state(&self) -> UsartState {
        self.fsm.current_state()
    }

    pub fn id(&self) -> usize {
        self.data.id
    }

    /// The last received line, padded with [`EMPTY_BYTE`].
    pub fn in_data(&self) -> &[u8; USART_INPUT_BUFFER_LEN] {
        &self.data.in_data
    }

    /// Queue `data` for transmission, keeping at most the first 100 bytes.
    pub fn set_out_data(&mut self, data: &[u8]) {
        let len = data.len().min(USART_OUTPUT_BUFFER_LEN);
        self.data.out_data.fill(EMPTY_BYTE);
        self.data.out_data[..len].copy_from_slice(&data[..len]);
    }

    pub fn has_pending_output(&self) -> bool {
        self.data.out_data[0] != EMPTY_BYTE
    }

    pub fn data_received(&self) -> bool {
        self.data.data_received
    }

    pub fn reset_input_data(&mut self) {
        self.data.in_data.fill(EMPTY_BYTE);
        self.data.data_received = false;
    }

    /// Whether a line is being sent or a received one is still unread.
    pub fn check_activity(&self) -> bool {
        !self.state().is_idle() || self.data.data_received
    }

    pub fn enable_rx_interrupt(&self) {
        self.io.link.enable_rx_interrupt(self.data.id);
    }

    pub fn disable_rx_interrupt(&self) {
        self.io.link.disable_rx_interrupt(self.data.id);
    }

    pub fn enable_tx_interrupt(&self) {
        self.io.link.enable_tx_interrupt(self.data.id);
    }

    pub fn disable_tx_interrupt(&self) {
        self.io.link.disable_tx_interrupt(self.data.id);
    }
}

impl std::fmt::Debug for UsartFsm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsartFsm")
            .field("state", &self.state())
            .field("id", &self.data.id)
            .field("data_received", &self.data.data_received)
            .finish()
    }
}
