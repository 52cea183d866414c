//! Record sources
//!
//! The read side of the gateway as a trait, so the record store can be
//! filled from the REST API or from anything else that yields records.

use async_trait::async_trait;

use super::client::Gateway;
use super::error::GatewayResult;
use crate::records::{AttendanceRecord, FinancialRecord, Patient, Staff, Transaction};

/// Something the record store can load collections from
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_patients(&self) -> GatewayResult<Vec<Patient>>;

    async fn fetch_staff(&self) -> GatewayResult<Vec<Staff>>;

    async fn fetch_financial(&self) -> GatewayResult<Vec<FinancialRecord>>;

    async fn fetch_attendance(&self) -> GatewayResult<Vec<AttendanceRecord>>;

    async fn fetch_transactions(&self) -> GatewayResult<Vec<Transaction>>;
}

#[async_trait]
impl RecordSource for Gateway {
    async fn fetch_patients(&self) -> GatewayResult<Vec<Patient>> {
        self.list().await
    }

    async fn fetch_staff(&self) -> GatewayResult<Vec<Staff>> {
        self.list().await
    }

    async fn fetch_financial(&self) -> GatewayResult<Vec<FinancialRecord>> {
        self.list().await
    }

    async fn fetch_attendance(&self) -> GatewayResult<Vec<AttendanceRecord>> {
        self.list().await
    }

    async fn fetch_transactions(&self) -> GatewayResult<Vec<Transaction>> {
        self.list().await
    }
}
