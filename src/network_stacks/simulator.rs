//! # Network Simulator - Scripted Stack Double
//!
//! A host-side stand-in for the wireless stack. Each operation answers from
//! its own script of result codes; once a script runs dry the operation
//! succeeds. Sends that are not scripted can additionally lose their
//! acknowledgment at random, which is how the host demo exercises the retry
//! and rescan paths.
//!
//! ## Accounting
//!
//! Every call is counted ([`SimulatorStats`]) and every transmitted frame is
//! recorded with its options and the radio power state at send time, so tests
//! can assert exact attempt, probe and power-cycle counts.

use std::collections::VecDeque;

use super::{LinkId, NetworkStack, TxOptions};
use crate::NetworkStatus;
use log::{Level, log};
use rand_core::RngCore;
use rand_core::SeedableRng;
use rand_wyrand::WyRand;

/// Run-length encoded queue of scripted results
#[derive(Default, Debug)]
struct Script {
    steps: VecDeque<(NetworkStatus, u32)>,
}

impl Script {
    fn push(&mut self, status: NetworkStatus, count: u32) {
        if count > 0 {
            self.steps.push_back((status, count));
        }
    }

    fn pop(&mut self) -> Option<NetworkStatus> {
        let (status, remaining) = self.steps.front_mut()?;
        let status = *status;
        *remaining -= 1;
        if *remaining == 0 {
            self.steps.pop_front();
        }
        Some(status)
    }

    fn outcome(status: Option<NetworkStatus>) -> Option<Result<(), NetworkStatus>> {
        status.map(|status| match status {
            NetworkStatus::Success => Ok(()),
            other => Err(other),
        })
    }
}

/// Call counters of a [`NetworkSimulator`]
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct SimulatorStats {
    pub init_calls: u32,
    pub link_calls: u32,
    pub send_calls: u32,
    pub ping_calls: u32,
    pub radio_sleeps: u32,
    pub radio_wakes: u32,
}

/// A frame handed to the simulated radio
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SentFrame {
    pub link: LinkId,
    pub payload: Vec<u8>,
    pub options: TxOptions,
    pub radio_awake: bool,
}

pub struct NetworkSimulator {
    link_id: LinkId,
    init_script: Script,
    link_script: Script,
    send_script: Script,
    ping_script: Script,
    ack_loss_percent: u8,
    rng: WyRand,
    radio_awake: bool,
    stats: SimulatorStats,
    sent_frames: Vec<SentFrame>,
}

impl NetworkSimulator {
    /// Creates a simulator that succeeds at everything until scripted otherwise
    pub fn new(rng_seed: u64) -> Self {
        NetworkSimulator {
            link_id: LinkId(1),
            init_script: Script::default(),
            link_script: Script::default(),
            send_script: Script::default(),
            ping_script: Script::default(),
            ack_loss_percent: 0,
            rng: WyRand::seed_from_u64(rng_seed),
            radio_awake: true,
            stats: SimulatorStats::default(),
            sent_frames: Vec::new(),
        }
    }

    /// Link handle handed out by a successful `link()`
    pub fn with_link_id(mut self, link_id: LinkId) -> Self {
        self.link_id = link_id;
        self
    }

    /// Unscripted sends lose their ack with this probability (0..=100)
    pub fn with_ack_loss(mut self, percent: u8) -> Self {
        self.ack_loss_percent = percent.min(100);
        self
    }

    /// Next `count` init calls report `status`
    pub fn script_init(&mut self, status: NetworkStatus, count: u32) -> &mut Self {
        self.init_script.push(status, count);
        self
    }

    /// Next `count` link calls report `status`
    pub fn script_link(&mut self, status: NetworkStatus, count: u32) -> &mut Self {
        self.link_script.push(status, count);
        self
    }

    /// Next `count` sends report `status`
    pub fn script_send(&mut self, status: NetworkStatus, count: u32) -> &mut Self {
        self.send_script.push(status, count);
        self
    }

    /// Next `count` pings report `status`
    pub fn script_ping(&mut self, status: NetworkStatus, count: u32) -> &mut Self {
        self.ping_script.push(status, count);
        self
    }

    pub fn stats(&self) -> SimulatorStats {
        self.stats
    }

    pub fn sent_frames(&self) -> &[SentFrame] {
        &self.sent_frames
    }

    pub fn radio_awake(&self) -> bool {
        self.radio_awake
    }

    fn random_ack_loss(&mut self) -> bool {
        self.ack_loss_percent > 0 && (self.rng.next_u32() % 100) < self.ack_loss_percent as u32
    }
}

impl NetworkStack for NetworkSimulator {
    async fn init(&mut self) -> Result<(), NetworkStatus> {
        self.stats.init_calls += 1;
        Script::outcome(self.init_script.pop()).unwrap_or(Ok(()))
    }

    async fn link(&mut self) -> Result<LinkId, NetworkStatus> {
        self.stats.link_calls += 1;
        Script::outcome(self.link_script.pop())
            .unwrap_or(Ok(()))
            .map(|_| self.link_id)
    }

    async fn send(&mut self, link: LinkId, payload: &[u8], options: TxOptions) -> Result<(), NetworkStatus> {
        self.stats.send_calls += 1;
        self.sent_frames.push(SentFrame {
            link,
            payload: payload.to_vec(),
            options,
            radio_awake: self.radio_awake,
        });
        if link != self.link_id {
            return Err(NetworkStatus::NoLink);
        }
        if let Some(result) = Script::outcome(self.send_script.pop()) {
            return result;
        }
        if options.ack_request && self.random_ack_loss() {
            log!(Level::Trace, "Simulated ack loss for frame {:?}", payload);
            return Err(NetworkStatus::NoAck);
        }
        Ok(())
    }

    async fn ping(&mut self, link: LinkId) -> Result<(), NetworkStatus> {
        self.stats.ping_calls += 1;
        if link != self.link_id {
            return Err(NetworkStatus::NoLink);
        }
        Script::outcome(self.ping_script.pop()).unwrap_or(Ok(()))
    }

    fn radio_sleep(&mut self) {
        self.stats.radio_sleeps += 1;
        self.radio_awake = false;
    }

    fn radio_wake(&mut self) {
        self.stats.radio_wakes += 1;
        self.radio_awake = true;
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn scripts_run_in_order_then_succeed() {
        let mut sim = NetworkSimulator::new(1);
        sim.script_init(NetworkStatus::NoJoin, 2).script_init(NetworkStatus::Timeout, 1);
        block_on(async {
            assert_eq!(sim.init().await, Err(NetworkStatus::NoJoin));
            assert_eq!(sim.init().await, Err(NetworkStatus::NoJoin));
            assert_eq!(sim.init().await, Err(NetworkStatus::Timeout));
            assert_eq!(sim.init().await, Ok(()));
        });
        assert_eq!(sim.stats().init_calls, 4);
    }

    #[test]
    fn scripted_success_is_ok() {
        let mut sim = NetworkSimulator::new(1).with_link_id(LinkId(5));
        sim.script_link(NetworkStatus::NoLink, 1).script_link(NetworkStatus::Success, 1);
        block_on(async {
            assert_eq!(sim.link().await, Err(NetworkStatus::NoLink));
            assert_eq!(sim.link().await, Ok(LinkId(5)));
        });
    }

    #[test]
    fn records_frames_with_radio_state() {
        let mut sim = NetworkSimulator::new(1);
        sim.script_send(NetworkStatus::NoAck, 1);
        sim.radio_sleep();
        block_on(async {
            assert_eq!(sim.send(LinkId(1), &[2, 9], TxOptions::ACK_REQUEST).await, Err(NetworkStatus::NoAck));
        });
        sim.radio_wake();
        block_on(async {
            assert_eq!(sim.send(LinkId(1), &[2, 9], TxOptions::ACK_REQUEST).await, Ok(()));
        });

        let frames = sim.sent_frames();
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].radio_awake);
        assert!(frames[1].radio_awake);
        assert_eq!(frames[1].payload, vec![2, 9]);
        assert_eq!(sim.stats().radio_sleeps, 1);
        assert_eq!(sim.stats().radio_wakes, 1);
    }

    #[test]
    fn full_ack_loss_drops_every_acked_send() {
        let mut sim = NetworkSimulator::new(7).with_ack_loss(100);
        block_on(async {
            for _ in 0..10 {
                assert_eq!(sim.send(LinkId(1), &[1, 1], TxOptions::ACK_REQUEST).await, Err(NetworkStatus::NoAck));
            }
            assert_eq!(sim.send(LinkId(1), &[1, 1], TxOptions::NONE).await, Ok(()));
        });
    }

    #[test]
    fn partial_ack_loss_is_deterministic_per_seed() {
        let outcomes = |seed| {
            let mut sim = NetworkSimulator::new(seed).with_ack_loss(50);
            block_on(async {
                let mut results = Vec::new();
                for _ in 0..32 {
                    results.push(sim.send(LinkId(1), &[1, 1], TxOptions::ACK_REQUEST).await.is_ok());
                }
                results
            })
        };
        let first = outcomes(42);
        assert_eq!(first, outcomes(42));
        assert!(first.iter().any(|ok| *ok));
        assert!(first.iter().any(|ok| !*ok));
    }
}
