/// Premium administration: entitlements, promo codes and payments
use super::users::{AdminUserView, UserDirectory};
use crate::{
    activity::{ActivityCategory, ActivityLog},
    billing::{Payment, PaymentLedger},
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
    validation::FieldErrors,
};
use chrono::{DateTime, TimeZone, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Promotional discount code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCode {
    pub code: String,
    pub discount_percent: u8,
    pub max_uses: u32,
    pub uses: u32,
    pub active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromoCode {
    /// Generated when empty
    #[serde(default)]
    #[validate(length(max = 20, message = "Code must be 20 characters or fewer"))]
    pub code: String,
    #[validate(range(min = 1, max = 100, message = "Discount must be between 1 and 100"))]
    pub discount_percent: u8,
    #[validate(range(min = 1, message = "Max uses must be at least 1"))]
    pub max_uses: u32,
}

#[derive(Clone)]
pub struct PremiumAdmin {
    repo: Repository,
    users: UserDirectory,
    ledger: PaymentLedger,
    activity: ActivityLog,
}

impl PremiumAdmin {
    pub fn new(
        repo: Repository,
        users: UserDirectory,
        ledger: PaymentLedger,
        activity: ActivityLog,
    ) -> Self {
        Self {
            repo,
            users,
            ledger,
            activity,
        }
    }

    pub async fn grant(&self, user_id: &str) -> AmoraResult<AdminUserView> {
        let user = self.users.set_premium(user_id, true).await?;
        self.activity
            .record(
                "premium_granted",
                &format!("User ID: {}", user_id),
                &format!("Granted premium to {}", user.name),
                ActivityCategory::Premium,
            )
            .await;
        Ok(user)
    }

    pub async fn revoke(&self, user_id: &str) -> AmoraResult<AdminUserView> {
        let user = self.users.set_premium(user_id, false).await?;
        self.activity
            .record(
                "premium_revoked",
                &format!("User ID: {}", user_id),
                &format!("Revoked premium from {}", user.name),
                ActivityCategory::Premium,
            )
            .await;
        Ok(user)
    }

    pub async fn promo_codes(&self) -> Vec<PromoCode> {
        self.repo
            .load::<Vec<PromoCode>>(StoreKey::PromoCodes)
            .await
            .unwrap_or_else(seed_promo_codes)
    }

    pub async fn create_promo_code(
        &self,
        req: CreatePromoCode,
        admin: &str,
    ) -> AmoraResult<PromoCode> {
        let mut errors = FieldErrors::default();
        errors.check(&req);
        let code = req.code.trim().to_uppercase();
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push("code", "Code may only contain letters and digits");
        }
        errors.into_result()?;

        let code = if code.is_empty() { generate_code() } else { code };

        let mut codes = self.promo_codes().await;
        if codes.iter().any(|c| c.code == code) {
            return Err(AmoraError::Conflict(format!("Promo code {} already exists", code)));
        }

        let promo = PromoCode {
            code,
            discount_percent: req.discount_percent,
            max_uses: req.max_uses,
            uses: 0,
            active: true,
            created_by: admin.to_string(),
            created_at: Utc::now(),
        };
        codes.push(promo.clone());
        self.repo.save(StoreKey::PromoCodes, &codes).await?;

        self.activity
            .record(
                "promo_code_created",
                &format!("Promo Code: {}", promo.code),
                &format!(
                    "Created promo code {} ({}% off, {} uses)",
                    promo.code, promo.discount_percent, promo.max_uses
                ),
                ActivityCategory::Premium,
            )
            .await;

        info!("promo code {} created by {}", promo.code, admin);
        Ok(promo)
    }

    pub async fn deactivate_promo_code(&self, code: &str) -> AmoraResult<PromoCode> {
        let wanted = code.trim().to_uppercase();
        let mut codes = self.promo_codes().await;
        let promo = codes
            .iter_mut()
            .find(|c| c.code == wanted)
            .ok_or_else(|| AmoraError::NotFound(format!("Promo code {} not found", wanted)))?;

        if !promo.active {
            return Err(AmoraError::Conflict(format!(
                "Promo code {} is already inactive",
                wanted
            )));
        }
        promo.active = false;
        let deactivated = promo.clone();
        self.repo.save(StoreKey::PromoCodes, &codes).await?;

        self.activity
            .record(
                "promo_code_deactivated",
                &format!("Promo Code: {}", wanted),
                &format!("Deactivated promo code {}", wanted),
                ActivityCategory::Premium,
            )
            .await;
        Ok(deactivated)
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.ledger.all().await
    }

    pub async fn refund(&self, payment_id: &str) -> AmoraResult<Payment> {
        let payment = self.ledger.refund(payment_id).await?;
        self.activity
            .record(
                "payment_refunded",
                &format!("Payment ID: {}", payment.id),
                &format!(
                    "Refunded ${}.{:02} to {}",
                    payment.amount_cents / 100,
                    payment.amount_cents % 100,
                    payment.user_name
                ),
                ActivityCategory::Premium,
            )
            .await;
        Ok(payment)
    }
}

fn generate_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

fn seed_promo_codes() -> Vec<PromoCode> {
    let created_at = Utc
        .with_ymd_and_hms(2024, 2, 1, 9, 0, 0)
        .single()
        .unwrap_or_default();
    vec![
        PromoCode {
            code: "WELCOME10".to_string(),
            discount_percent: 10,
            max_uses: 500,
            uses: 132,
            active: true,
            created_by: "admin".to_string(),
            created_at,
        },
        PromoCode {
            code: "LOVE25".to_string(),
            discount_percent: 25,
            max_uses: 100,
            uses: 100,
            active: false,
            created_by: "admin".to_string(),
            created_at,
        },
    ]
}
