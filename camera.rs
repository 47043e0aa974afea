/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Camera view bounds and the debounced zoom-to-fit machinery.
//!
//! Fit requests go to one long-lived `FitTimer` worker. Each request
//! restarts the quiet period; when it elapses the worker posts a single
//! `FitDue` which the UI thread drains and applies to the `Camera`.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, error};

use crate::scene::Bounds;

/// What the panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    view_bounds: Option<Bounds>,
    fits: u64,
}

impl Camera {
    pub fn view_bounds(&self) -> Option<Bounds> {
        self.view_bounds
    }

    pub fn set_view_bounds(&mut self, bounds: Bounds) {
        self.view_bounds = Some(bounds);
        self.fits += 1;
    }

    /// How many times the view was refitted.
    pub fn fit_count(&self) -> u64 {
        self.fits
    }
}

/// Pure coalescing state: a deadline that every request pushes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
    force: bool,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            force: false,
        }
    }

    /// Cancel any pending fire and schedule a new one `delay` after `now`.
    /// A pending forced request stays forced.
    pub fn request(&mut self, now: Instant, force: bool) {
        if self.deadline.is_none() {
            self.force = false;
        }
        self.force |= force;
        self.deadline = Some(now + self.delay);
    }

    /// Fire if the deadline has passed. Returns the force flag of the fire.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(std::mem::take(&mut self.force))
            },
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// A debounced fit whose quiet period elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitDue {
    pub force: bool,
}

/// Long-lived worker that debounces fit requests.
#[derive(Debug)]
pub struct FitTimer {
    requests: Option<Sender<bool>>,
    due: Receiver<FitDue>,
    worker: Option<JoinHandle<()>>,
}

impl FitTimer {
    pub fn new(delay: Duration) -> Self {
        let (request_tx, request_rx) = unbounded::<bool>();
        let (due_tx, due_rx) = unbounded();
        let worker = std::thread::Builder::new()
            .name("fit-timer".into())
            .spawn(move || run_worker(delay, request_rx, due_tx));
        let (requests, worker) = match worker {
            Ok(handle) => (Some(request_tx), Some(handle)),
            Err(err) => {
                error!("cannot start fit timer, camera fits are disabled: {err}");
                (None, None)
            },
        };
        Self {
            requests,
            due: due_rx,
            worker,
        }
    }

    pub fn request(&self, force: bool) {
        if let Some(requests) = &self.requests {
            if requests.send(force).is_err() {
                debug!("fit timer worker is gone");
            }
        }
    }

    /// Drain every fit that came due. Several fits collapse into one that is
    /// forced if any of them was.
    pub fn try_due(&self) -> Option<FitDue> {
        self.due
            .try_iter()
            .reduce(|acc, next| FitDue { force: acc.force || next.force })
    }

    /// Block up to `timeout` for the next fit to come due.
    pub fn wait_due(&self, timeout: Duration) -> Option<FitDue> {
        let first = self.due.recv_timeout(timeout).ok()?;
        Some(match self.try_due() {
            Some(more) => FitDue { force: first.force || more.force },
            None => first,
        })
    }
}

impl Drop for FitTimer {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("fit timer worker panicked");
            }
        }
    }
}

fn run_worker(delay: Duration, requests: Receiver<bool>, due: Sender<FitDue>) {
    let mut debounce = Debounce::new(delay);
    loop {
        let message = match debounce.time_until_due(Instant::now()) {
            Some(wait) => requests.recv_timeout(wait),
            None => requests.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match message {
            Ok(force) => debounce.request(Instant::now(), force),
            Err(RecvTimeoutError::Timeout) => {},
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(force) = debounce.poll(Instant::now()) {
            if due.send(FitDue { force }).is_err() {
                break;
            }
        }
    }
}
