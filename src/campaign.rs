// File: campaign.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::catalog::{Catalog, DetectionTemplate, PermutationTemplate};
use crate::classifier::{Classifier, MedianClassifier, ThresholdClassifier, Verdict};
use crate::config::{ConnectionFailurePolicy, RunConfig};
use crate::confirm::{Confirmation, Confirmer, NoConfirmation};
use crate::error::{ProbeError, SmuggleError, SmuggleResult};
use crate::request;
use crate::stats::CampaignStats;
use crate::transport::{ProbeResponse, Transport};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One record per (detection, permutation) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeResult {
    pub index: usize,
    pub permutation_type: String,
    pub detection_type: String,
    pub host: String,
    pub status: Option<String>,
    pub elapsed_secs: f64,
    pub verdict: Verdict,
    pub attempts: u32,
    pub error: Option<String>,
    pub confirmation: Confirmation,
    pub request_fingerprint: String,
}

/// Stops a running campaign before its next probe. Probes already in
/// flight finish or are dropped with their own connection.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Campaign<T: Transport> {
    config: RunConfig,
    transport: T,
    classifier: Box<dyn Classifier>,
    confirmer: Box<dyn Confirmer>,
    stop: StopHandle,
}

impl<T: Transport> Campaign<T> {
    pub fn new(config: RunConfig, transport: T) -> Self {
        let classifier: Box<dyn Classifier> = if config.samples() > 1 {
            Box::new(MedianClassifier::new(config.samples()))
        } else {
            Box::new(ThresholdClassifier)
        };

        Self {
            config,
            transport,
            classifier,
            confirmer: Box::new(NoConfirmation),
            stop: StopHandle::default(),
        }
    }

    pub fn with_classifier<C: Classifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_confirmer<C: Confirmer + 'static>(mut self, confirmer: C) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Shares an existing handle, e.g. one already wired to a signal handler.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Loads the catalog and runs it. Nothing touches the network when the
    /// catalog cannot be loaded.
    pub async fn run_from_file<P, F>(&self, path: P, emit: F) -> SmuggleResult<CampaignStats>
    where
        P: AsRef<Path>,
        F: FnMut(&ProbeResult) -> SmuggleResult<()>,
    {
        let catalog = Catalog::load(path)?;
        self.run(&catalog, emit).await
    }

    /// Probes every detection x permutation pair and hands each result to
    /// `emit` as soon as it is available, in catalog order.
    pub async fn run<F>(&self, catalog: &Catalog, mut emit: F) -> SmuggleResult<CampaignStats>
    where
        F: FnMut(&ProbeResult) -> SmuggleResult<()>,
    {
        let mut stats = CampaignStats::new(catalog.probe_count());
        info!(
            "Starting campaign against {} with {} probes (method {}, threshold {}s, deadline {:?}, retry {}, concurrency {})",
            self.config.target(),
            catalog.probe_count(),
            self.config.method(),
            self.config.timeout(),
            self.config.deadline(),
            self.config.retry(),
            self.config.concurrency()
        );

        let probes = stream::iter(catalog.pairs().enumerate())
            .map(|(index, (detection, permutation))| self.probe_pair(index, detection, permutation))
            .buffered(self.config.concurrency());
        futures::pin_mut!(probes);

        loop {
            if self.stop.is_stopped() {
                info!("Campaign stopped after {} probes", stats.completed());
                stats.set_cancelled();
                break;
            }
            match probes.next().await {
                Some(result) => {
                    if let Some(result) = result? {
                        stats.record(result.verdict);
                        emit(&result)?;
                    }
                }
                None => break,
            }
        }

        stats.finish();
        info!("{}", stats.summary());
        Ok(stats)
    }

    /// Runs the whole campaign and returns the results in order.
    pub async fn collect(&self, catalog: &Catalog) -> SmuggleResult<Vec<ProbeResult>> {
        let mut results = Vec::with_capacity(catalog.probe_count());
        self.run(catalog, |result| {
            results.push(result.clone());
            Ok(())
        })
        .await?;
        Ok(results)
    }

    /// `None` when the campaign was stopped before the pair took a sample.
    async fn probe_pair(
        &self,
        index: usize,
        detection: &DetectionTemplate,
        permutation: &PermutationTemplate,
    ) -> SmuggleResult<Option<ProbeResult>> {
        if self.stop.is_stopped() {
            return Ok(None);
        }

        let target = self.config.target();
        let host = target.authority();
        let raw_request = request::build(self.config.method(), &host, permutation, detection);

        let mut result = ProbeResult {
            index,
            permutation_type: permutation.kind.clone(),
            detection_type: detection.kind.clone(),
            host,
            status: None,
            elapsed_secs: 0.0,
            verdict: Verdict::Error,
            attempts: 0,
            error: None,
            confirmation: Confirmation::NotAttempted,
            request_fingerprint: request::fingerprint(&raw_request),
        };

        let wanted = self.classifier.samples();
        let mut samples = Vec::with_capacity(wanted);
        let mut hung = None;
        for _ in 0..wanted {
            if !samples.is_empty() && self.stop.is_stopped() {
                debug!("Probe {} stopped after {} samples", index, samples.len());
                break;
            }
            match self.probe_with_retry(&raw_request, &mut result.attempts).await {
                Ok(response) => {
                    if let Some(status) = response.status {
                        result.status = Some(status);
                    }
                    samples.push(response.elapsed);
                    if response.timed_out {
                        // Each further sample would wait out the full deadline again.
                        hung = Some(response.elapsed);
                        info!(
                            "No status line from {} within {:?}, skipping remaining samples",
                            target,
                            self.config.deadline()
                        );
                        break;
                    }
                }
                Err(e)
                    if e.is_connection_failure()
                        && self.config.connection_failure() == ConnectionFailurePolicy::Abort =>
                {
                    warn!(
                        "Giving up on {} after {} attempts: {}",
                        target, result.attempts, e
                    );
                    return Err(SmuggleError::Connection(e));
                }
                Err(e) => {
                    warn!(
                        "Probe {} ({} / {}) failed: {}",
                        index, result.permutation_type, result.detection_type, e
                    );
                    result.error = Some(e.to_string());
                    return Ok(Some(result));
                }
            }
        }

        let elapsed = hung.unwrap_or_else(|| self.classifier.summarize(&samples));
        result.elapsed_secs = elapsed.as_secs_f64();
        result.verdict = self.classifier.classify(elapsed, self.config.threshold());

        if result.verdict == Verdict::Suspicious {
            result.confirmation = self.confirmer.confirm(target, &raw_request).await;
        }

        debug!(
            "Probe {} ({} / {}): status {:?}, {:.3}s, {}",
            index,
            result.permutation_type,
            result.detection_type,
            result.status,
            result.elapsed_secs,
            result.verdict
        );
        Ok(Some(result))
    }

    async fn probe_with_retry(
        &self,
        raw_request: &[u8],
        attempts: &mut u32,
    ) -> Result<ProbeResponse, ProbeError> {
        let max_tries = self.config.retry() + 1;
        let mut tries = 0;
        loop {
            tries += 1;
            *attempts += 1;
            match self
                .transport
                .probe(self.config.target(), raw_request, self.config.deadline())
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && tries < max_tries && !self.stop.is_stopped() => {
                    warn!(
                        "Attempt {}/{} against {} failed: {}, retrying",
                        tries,
                        max_tries,
                        self.config.target(),
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}
