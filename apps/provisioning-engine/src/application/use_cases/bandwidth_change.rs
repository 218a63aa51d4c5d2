//! Bandwidth Change Use Case
//!
//! The self-service path for adjusting a live instance's bandwidth outside
//! an order: request, optionally schedule, then apply or cancel. Applying a
//! change is the only caller of `ServiceInstance::update_bandwidth` outside
//! direct order completion.

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, IdentityContext, ServiceCatalogPort};
use crate::config::EngineConfig;
use crate::domain::catalog::{CatalogRules, PricingCalculator};
use crate::domain::provisioning::repository::{BandwidthChangeRepository, InstanceRepository};
use crate::domain::provisioning::{BandwidthChange, ServiceInstance};
use crate::domain::shared::{Bandwidth, ChangeId, DomainError, InstanceId, Timestamp};

/// Use case for the bandwidth-change workflow.
pub struct BandwidthChangeUseCase<C, I, B, E>
where
    C: ServiceCatalogPort,
    I: InstanceRepository,
    B: BandwidthChangeRepository,
    E: EventPublisherPort,
{
    catalog: Arc<C>,
    instance_repo: Arc<I>,
    change_repo: Arc<B>,
    event_publisher: Arc<E>,
    config: EngineConfig,
}

impl<C, I, B, E> BandwidthChangeUseCase<C, I, B, E>
where
    C: ServiceCatalogPort,
    I: InstanceRepository,
    B: BandwidthChangeRepository,
    E: EventPublisherPort,
{
    /// Create a new `BandwidthChangeUseCase`.
    pub const fn new(
        catalog: Arc<C>,
        instance_repo: Arc<I>,
        change_repo: Arc<B>,
        event_publisher: Arc<E>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            instance_repo,
            change_repo,
            event_publisher,
            config,
        }
    }

    /// Record a bandwidth modification request against a live instance.
    ///
    /// Computes the signed monthly-cost impact and persists the record in
    /// PENDING; nothing on the instance changes until [`Self::apply`].
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing instance, `Forbidden` for an instance owned
    /// by another company, `InvalidState` when the instance cannot take a
    /// bandwidth change, `InvalidBandwidth` when the value fails the catalog
    /// bounds.
    pub async fn request_change(
        &self,
        identity: &IdentityContext,
        instance_id: &InstanceId,
        new_bandwidth: Bandwidth,
        reason: Option<String>,
    ) -> Result<BandwidthChange, DomainError> {
        tracing::info!(
            instance_id = %instance_id,
            new_bandwidth = %new_bandwidth,
            "requesting bandwidth change"
        );

        let instance = self.load_instance(instance_id).await?;
        if instance.company_id() != &identity.company_id {
            return Err(DomainError::forbidden("ServiceInstance", instance_id));
        }

        let service = self.catalog.get_service(instance.service_id()).await?;
        if !instance.can_adjust_bandwidth(&service) {
            return Err(DomainError::invalid_state(
                "ServiceInstance",
                instance.status(),
                "adjust bandwidth",
            ));
        }
        CatalogRules::validate_bandwidth(&service, Some(new_bandwidth))?;

        let cost_impact = PricingCalculator::modification_delta(
            &service,
            Some(instance.current_bandwidth()),
            Some(new_bandwidth),
        )?;

        let mut change = BandwidthChange::request(
            instance.id().clone(),
            identity.user_id.clone(),
            instance.current_bandwidth(),
            new_bandwidth,
            cost_impact,
            reason,
        )?;
        self.change_repo.save(&mut change).await?;
        Ok(change)
    }

    /// Schedule a pending change for a maintenance window.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing change, `InvalidState` outside PENDING,
    /// `Conflict` if retries are exhausted.
    pub async fn schedule(
        &self,
        change_id: &ChangeId,
        at: Timestamp,
    ) -> Result<BandwidthChange, DomainError> {
        let mut attempts = 0;
        loop {
            let mut change = self.load_change(change_id).await?;
            change.schedule(at)?;

            match self.change_repo.save(&mut change).await {
                Ok(()) => return Ok(change),
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(change_id = %change_id, "schedule lost a concurrent save, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Apply a pending or scheduled change to its target instance.
    ///
    /// Marks the record APPLIED and pushes the new bandwidth through the
    /// instance's single authorized mutation path. A change whose bandwidth
    /// no longer passes the catalog bounds is marked FAILED and the error is
    /// surfaced.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing change or instance, `InvalidState` for a
    /// change already terminal, `InvalidBandwidth` when the instance refuses
    /// the value, `Conflict` if retries are exhausted.
    pub async fn apply(&self, change_id: &ChangeId) -> Result<BandwidthChange, DomainError> {
        let mut attempts = 0;
        loop {
            let mut change = self.load_change(change_id).await?;
            let mut instance = self.load_instance(change.instance_id()).await?;
            let service = self.catalog.get_service(instance.service_id()).await?;

            let bandwidth = change.apply()?;
            if let Err(e) = instance.update_bandwidth(&service, bandwidth) {
                tracing::error!(
                    change_id = %change_id,
                    error = %e,
                    "bandwidth change failed to apply"
                );
                let mut failed = self.load_change(change_id).await?;
                failed.fail();
                self.change_repo.save(&mut failed).await?;
                return Err(e);
            }

            match self.instance_repo.save(&mut instance).await {
                Ok(()) => {
                    self.change_repo.save(&mut change).await?;
                    let events = instance.drain_events();
                    if let Err(e) = self.event_publisher.publish_instance_events(events).await {
                        tracing::error!("Failed to publish instance events: {}", e);
                    }
                    tracing::info!(change_id = %change_id, "bandwidth change applied");
                    return Ok(change);
                }
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        change_id = %change_id,
                        attempt = attempts,
                        "apply lost a concurrent save, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Cancel a pending or scheduled change owned by the calling company.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing change or instance, `Forbidden` for another
    /// company's instance, `InvalidState` once the change is terminal,
    /// `Conflict` if retries are exhausted.
    pub async fn cancel(
        &self,
        identity: &IdentityContext,
        change_id: &ChangeId,
    ) -> Result<BandwidthChange, DomainError> {
        let mut attempts = 0;
        loop {
            let mut change = self.load_change(change_id).await?;
            let instance = self.load_instance(change.instance_id()).await?;
            if instance.company_id() != &identity.company_id {
                return Err(DomainError::forbidden(
                    "ServiceInstance",
                    change.instance_id(),
                ));
            }

            change.cancel()?;

            match self.change_repo.save(&mut change).await {
                Ok(()) => return Ok(change),
                Err(e @ DomainError::Conflict { .. }) => {
                    attempts += 1;
                    if attempts >= self.config.max_save_retries {
                        return Err(e);
                    }
                    tracing::warn!(change_id = %change_id, "cancel lost a concurrent save, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn load_instance(&self, instance_id: &InstanceId) -> Result<ServiceInstance, DomainError> {
        self.instance_repo
            .find_by_id(instance_id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceInstance", instance_id))
    }

    async fn load_change(&self, change_id: &ChangeId) -> Result<BandwidthChange, DomainError> {
        self.change_repo
            .find_by_id(change_id)
            .await?
            .ok_or_else(|| DomainError::not_found("BandwidthChange", change_id))
    }
}
