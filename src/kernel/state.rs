use std::collections::{HashMap, VecDeque};

use super::record::Domain;
use crate::outputs::feed::FeedItem;

pub const DEFAULT_FEED_CAPACITY: usize = 50;

/// Strict state delta. This is the ONLY way session state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    RecordAccepted { item: FeedItem },
    DomainSwitched(Domain),
    CrisisRequested,
    CrisisSettled,
}

/// Display counters shown in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Records accepted since the last domain switch.
    pub count: u64,
    /// Critical records seen for the active domain.
    pub anomalies: u64,
}

/// Explicit session context: everything the dashboard remembers between
/// records. None of it feeds back into classification.
#[derive(Debug, Clone)]
pub struct SessionState {
    active_domain: Domain,
    stats: SessionStats,
    anomalies_by_domain: HashMap<Domain, u64>,
    feed: VecDeque<FeedItem>,
    feed_capacity: usize,
    crisis_in_flight: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Domain::Finance, DEFAULT_FEED_CAPACITY)
    }
}

impl SessionState {
    pub fn new(active_domain: Domain, feed_capacity: usize) -> Self {
        Self {
            active_domain,
            stats: SessionStats::default(),
            anomalies_by_domain: HashMap::new(),
            feed: VecDeque::with_capacity(feed_capacity),
            feed_capacity: feed_capacity.max(1),
            crisis_in_flight: false,
        }
    }

    pub fn active_domain(&self) -> Domain {
        self.active_domain
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn anomalies_for(&self, domain: Domain) -> u64 {
        self.anomalies_by_domain.get(&domain).copied().unwrap_or(0)
    }

    /// Newest first.
    pub fn feed(&self) -> impl Iterator<Item = &FeedItem> {
        self.feed.iter()
    }

    pub fn crisis_in_flight(&self) -> bool {
        self.crisis_in_flight
    }

    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::RecordAccepted { item } => {
                self.stats.count += 1;
                if item.critical {
                    self.stats.anomalies += 1;
                    *self.anomalies_by_domain.entry(self.active_domain).or_insert(0) += 1;
                }
                self.feed.push_front(item);
                self.feed.truncate(self.feed_capacity);
            }
            StateDelta::DomainSwitched(domain) => {
                self.active_domain = domain;
                self.feed.clear();
                self.stats = SessionStats {
                    count: 0,
                    anomalies: self.anomalies_for(domain),
                };
            }
            StateDelta::CrisisRequested => self.crisis_in_flight = true,
            StateDelta::CrisisSettled => self.crisis_in_flight = false,
        }
    }
}
