/// Premium plans and the payment ledger
use crate::{
    error::{AmoraError, AmoraResult},
    store::{Repository, StoreKey},
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// A purchasable premium plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub months: u32,
    pub price_cents: u32,
    pub popular: bool,
}

impl Plan {
    pub fn monthly_price_cents(&self) -> u32 {
        self.price_cents / self.months.max(1)
    }
}

const PLANS: &[Plan] = &[
    Plan {
        id: "premium-1m",
        name: "1 Month",
        months: 1,
        price_cents: 1999,
        popular: false,
    },
    Plan {
        id: "premium-6m",
        name: "6 Months",
        months: 6,
        price_cents: 5999,
        popular: true,
    },
    Plan {
        id: "premium-12m",
        name: "12 Months",
        months: 12,
        price_cents: 8999,
        popular: false,
    },
];

/// Features unlocked by premium
pub const PREMIUM_FEATURES: &[&str] = &[
    "See who liked you",
    "Unlimited likes",
    "Advanced filters",
    "Read receipts",
    "Priority profile boost",
];

pub fn plans() -> &'static [Plan] {
    PLANS
}

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
    Refunded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: Option<String>,
    pub user_name: String,
    pub plan_id: String,
    pub amount_cents: u32,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// Payments stored under `payments`, seeded with sample history
#[derive(Clone)]
pub struct PaymentLedger {
    repo: Repository,
}

impl PaymentLedger {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// All payments, newest first
    pub async fn all(&self) -> Vec<Payment> {
        let mut payments = self
            .repo
            .load::<Vec<Payment>>(StoreKey::Payments)
            .await
            .unwrap_or_else(seed_payments);
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments
    }

    pub async fn append(&self, payment: Payment) -> AmoraResult<()> {
        let mut payments = self.all().await;
        payments.push(payment);
        self.repo.save(StoreKey::Payments, &payments).await
    }

    /// Record a completed purchase of `plan`
    pub async fn charge(
        &self,
        plan: &Plan,
        user_id: Option<String>,
        user_name: &str,
    ) -> AmoraResult<Payment> {
        let payment = Payment {
            id: format!("pay_{}", Uuid::new_v4().simple()),
            user_id,
            user_name: user_name.to_string(),
            plan_id: plan.id.to_string(),
            amount_cents: plan.price_cents,
            status: PaymentStatus::Completed,
            created_at: Utc::now(),
        };
        self.append(payment.clone()).await?;
        info!("payment {} recorded for {}", payment.id, user_name);
        Ok(payment)
    }

    /// Mark a completed payment refunded
    pub async fn refund(&self, payment_id: &str) -> AmoraResult<Payment> {
        let mut payments = self.all().await;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| AmoraError::NotFound(format!("Payment {} not found", payment_id)))?;

        if payment.status != PaymentStatus::Completed {
            return Err(AmoraError::Conflict(format!(
                "Payment {} cannot be refunded",
                payment_id
            )));
        }

        payment.status = PaymentStatus::Refunded;
        let refunded = payment.clone();
        self.repo.save(StoreKey::Payments, &payments).await?;
        Ok(refunded)
    }

    /// Sum of completed payments
    pub async fn revenue_cents(&self) -> u64 {
        self.all()
            .await
            .iter()
            .filter(|p| p.status == PaymentStatus::Completed)
            .map(|p| u64::from(p.amount_cents))
            .sum()
    }
}

fn seed_payments() -> Vec<Payment> {
    let at = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().unwrap_or_default();
    vec![
        Payment {
            id: "pay_seed_1".to_string(),
            user_id: Some("2".to_string()),
            user_name: "Michael".to_string(),
            plan_id: "premium-6m".to_string(),
            amount_cents: 5999,
            status: PaymentStatus::Completed,
            created_at: at(2024, 3, 2),
        },
        Payment {
            id: "pay_seed_2".to_string(),
            user_id: Some("6".to_string()),
            user_name: "Alex".to_string(),
            plan_id: "premium-1m".to_string(),
            amount_cents: 1999,
            status: PaymentStatus::Completed,
            created_at: at(2024, 3, 9),
        },
        Payment {
            id: "pay_seed_3".to_string(),
            user_id: Some("9".to_string()),
            user_name: "Ryan".to_string(),
            plan_id: "premium-12m".to_string(),
            amount_cents: 8999,
            status: PaymentStatus::Refunded,
            created_at: at(2024, 3, 15),
        },
        Payment {
            id: "pay_seed_4".to_string(),
            user_id: Some("5".to_string()),
            user_name: "Olivia".to_string(),
            plan_id: "premium-1m".to_string(),
            amount_cents: 1999,
            status: PaymentStatus::Failed,
            created_at: at(2024, 3, 21),
        },
    ]
}
