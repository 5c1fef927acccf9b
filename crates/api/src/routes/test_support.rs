//! Fixtures for router tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use potluck_core::currency::{CurrencyNormalizer, ProviderError, RateProvider, StaticRateTable};
use potluck_core::expense::NewExpense;
use potluck_shared::types::{CurrencyCode, ExpenseId, GroupId, MemberId};
use potluck_store::{GroupRecord, JsonStore, MemberRecord};
use rust_decimal::Decimal;
use tower::ServiceExt;

use crate::{AppState, create_router};

/// Answers every pair with the same rate.
pub(crate) struct FixedRateProvider(Decimal);

impl FixedRateProvider {
    pub(crate) fn new(rate: Decimal) -> Self {
        Self(rate)
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    fn id(&self) -> &'static str {
        "FIXED"
    }

    async fn fetch_rate(
        &self,
        _base: CurrencyCode,
        _symbol: CurrencyCode,
    ) -> Result<Decimal, ProviderError> {
        Ok(self.0)
    }
}

/// Always unreachable.
pub(crate) struct FailingProvider;

#[async_trait]
impl RateProvider for FailingProvider {
    fn id(&self) -> &'static str {
        "FAILING"
    }

    async fn fetch_rate(
        &self,
        _base: CurrencyCode,
        _symbol: CurrencyCode,
    ) -> Result<Decimal, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

fn display_name(id: &str) -> String {
    match id {
        "a" => "Ana".into(),
        "b" => "Bruno".into(),
        "c" => "Carla".into(),
        other => other.to_uppercase(),
    }
}

pub(crate) fn group(id: &str, base: CurrencyCode, members: &[&str]) -> GroupRecord {
    GroupRecord {
        id: GroupId::from(id),
        name: format!("Group {id}"),
        base_currency: base,
        members: members
            .iter()
            .map(|m| MemberRecord {
                id: MemberId::from(*m),
                name: display_name(m),
            })
            .collect(),
        expenses: Vec::new(),
    }
}

pub(crate) fn new_expense(
    id: &str,
    payer: &str,
    amount: Decimal,
    currency: CurrencyCode,
    participants: &[&str],
) -> NewExpense {
    NewExpense {
        id: ExpenseId::from(id),
        payer_id: MemberId::from(payer),
        amount,
        currency,
        participant_ids: participants.iter().map(|p| MemberId::from(*p)).collect(),
        category: None,
        description: None,
        // 2023-11-14T22:13:20Z
        timestamp_millis: Some(1_700_000_000_000),
        created_at_millis: 1_700_000_000_000,
    }
}

/// Builds state over a temporary store seeded with `groups`.
///
/// The fallback table is empty so unknown pairs degrade to 1:1.
pub(crate) async fn state_with(
    provider: impl RateProvider + 'static,
    groups: Vec<GroupRecord>,
) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    for g in groups {
        store.upsert_group(g).await.unwrap();
    }

    let normalizer = CurrencyNormalizer::builder(Arc::new(provider))
        .fallback_table(StaticRateTable::empty())
        .build();

    let state = AppState {
        store: Arc::new(store),
        normalizer: Arc::new(normalizer),
    };
    (state, dir)
}

/// Sends a GET through the full router and parses the JSON body.
pub(crate) async fn get_json(state: &AppState, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = create_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}
