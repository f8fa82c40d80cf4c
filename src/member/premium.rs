/// Premium upsell and subscription state
use super::auth::AuthData;
use crate::{
    billing::{self, Payment, PaymentLedger, Plan},
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatus {
    pub is_premium: bool,
    pub features: &'static [&'static str],
    pub plans: &'static [Plan],
}

#[derive(Clone)]
pub struct PremiumService {
    repo: Repository,
    ledger: PaymentLedger,
}

impl PremiumService {
    pub fn new(repo: Repository, ledger: PaymentLedger) -> Self {
        Self { repo, ledger }
    }

    pub async fn is_premium(&self) -> bool {
        self.repo.load_or_default(StoreKey::IsPremium).await
    }

    pub async fn status(&self) -> PremiumStatus {
        PremiumStatus {
            is_premium: self.is_premium().await,
            features: billing::PREMIUM_FEATURES,
            plans: billing::plans(),
        }
    }

    /// Buy a plan and switch premium on
    pub async fn subscribe(&self, plan_id: &str) -> AmoraResult<Payment> {
        let plan = billing::find_plan(plan_id)
            .ok_or_else(|| AmoraError::NotFound(format!("Plan {} not found", plan_id)))?;

        if self.is_premium().await {
            return Err(AmoraError::Conflict("Premium is already active".to_string()));
        }

        let buyer = self
            .repo
            .load::<AuthData>(StoreKey::AuthData)
            .await
            .map(|a| a.name)
            .unwrap_or_else(|| "You".to_string());

        let payment = self.ledger.charge(plan, None, &buyer).await?;
        self.repo.save(StoreKey::IsPremium, &true).await?;

        info!("premium activated with plan {}", plan.id);
        Ok(payment)
    }

    pub async fn cancel(&self) -> AmoraResult<()> {
        self.repo.save(StoreKey::IsPremium, &false).await?;
        info!("premium cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn service() -> PremiumService {
        let repo = Repository::new(Arc::new(MemoryStore::new()));
        PremiumService::new(repo.clone(), PaymentLedger::new(repo))
    }

    #[tokio::test]
    async fn test_subscribe_flow() {
        let premium = service();
        assert!(!premium.status().await.is_premium);

        assert!(matches!(
            premium.subscribe("lifetime").await,
            Err(AmoraError::NotFound(_))
        ));

        let payment = premium.subscribe("premium-12m").await.unwrap();
        assert_eq!(payment.amount_cents, 8999);
        assert_eq!(payment.user_name, "You");
        assert!(premium.is_premium().await);

        assert!(matches!(
            premium.subscribe("premium-1m").await,
            Err(AmoraError::Conflict(_))
        ));

        premium.cancel().await.unwrap();
        assert!(!premium.is_premium().await);
    }

    #[tokio::test]
    async fn test_malformed_flag_reads_as_free() {
        let premium = service();
        premium
            .repo
            .store()
            .put(StoreKey::IsPremium.as_str(), "yes please".to_string())
            .await
            .unwrap();
        assert!(!premium.is_premium().await);
    }
}
