//! Record store
//!
//! The single owner of the mirrored collections. Views receive a reference
//! to the store, read through snapshots or selectors, and listen for
//! [`StoreEvent`]s instead of polling.

use chrono::NaiveDate;
use tokio::sync::{broadcast, RwLock};

use super::collections::{remove_by_id, replace_by_id, Collections, Stored};
use super::error::{StoreError, StoreResult};
use super::events::{LoadReport, StoreEvent};
use crate::analytics::dashboard::{
    AttendanceOverview, DashboardSummary, FinanceOverview, PatientOverview, StaffOverview,
};
use crate::gateway::{Gateway, GatewayError, GatewayResult, RecordSource};
use crate::notify::Notifier;
use crate::records::{
    AttendanceRecord, EntityKind, FinancialRecord, Patient, Record, RecordId, Staff, Transaction,
};

const EVENT_CAPACITY: usize = 256;

/// Shared application data store
pub struct RecordStore {
    collections: RwLock<Collections>,
    events: broadcast::Sender<StoreEvent>,
    notifier: Option<Notifier>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            collections: RwLock::new(Collections::default()),
            events,
            notifier: None,
        }
    }

    /// Builder: report failures and completed actions through `notifier`
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load patients, staff and financial records concurrently
    ///
    /// Waits for all three. Each successful collection is applied; each
    /// failure is logged, reported and leaves that collection untouched.
    pub async fn load_initial<S: RecordSource + ?Sized>(&self, source: &S) -> LoadReport {
        let (patients, staff, financial) = tokio::join!(
            source.fetch_patients(),
            source.fetch_staff(),
            source.fetch_financial()
        );

        let mut report = LoadReport::default();
        self.apply_load(patients, &mut report).await;
        self.apply_load(staff, &mut report).await;
        self.apply_load(financial, &mut report).await;

        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "Initial load finished"
        );
        report
    }

    /// Reload a single collection
    pub async fn load<S: RecordSource + ?Sized>(
        &self,
        source: &S,
        kind: EntityKind,
    ) -> StoreResult<usize> {
        let count = match kind {
            EntityKind::Patients => self.replace(source.fetch_patients().await?).await,
            EntityKind::Staff => self.replace(source.fetch_staff().await?).await,
            EntityKind::Financial => self.replace(source.fetch_financial().await?).await,
            EntityKind::Attendance => self.replace(source.fetch_attendance().await?).await,
            EntityKind::Transactions => self.replace(source.fetch_transactions().await?).await,
        };
        Ok(count)
    }

    pub async fn load_attendance<S: RecordSource + ?Sized>(
        &self,
        source: &S,
    ) -> StoreResult<usize> {
        self.load(source, EntityKind::Attendance).await
    }

    async fn apply_load<R: Stored>(&self, result: GatewayResult<Vec<R>>, report: &mut LoadReport) {
        match result {
            Ok(records) => {
                let count = self.replace(records).await;
                report.loaded.push((R::KIND, count));
            }
            Err(e) => {
                tracing::error!(entity = %R::KIND, error = %e, "Failed to load collection");
                if let Some(notifier) = &self.notifier {
                    notifier.error(format!("Could not load {}: {}", R::KIND, e));
                }
                report.failed.push((R::KIND, e.to_string()));
            }
        }
    }

    async fn replace<R: Stored>(&self, records: Vec<R>) -> usize {
        let count = records.len();
        {
            let mut collections = self.collections.write().await;
            *R::slot_mut(&mut collections) = records;
        }

        tracing::debug!(entity = %R::KIND, count, "Collection loaded");
        self.publish(StoreEvent::Loaded {
            kind: R::KIND,
            count,
        });
        count
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Validate, POST, then append the server's copy locally
    pub async fn create<R: Stored>(&self, gateway: &Gateway, record: R) -> StoreResult<R> {
        self.check(&record)?;
        let created = gateway
            .create(&record)
            .await
            .map_err(|e| self.failed("create", R::KIND, e))?;

        R::slot_mut(&mut *self.collections.write().await).push(created.clone());

        self.publish(StoreEvent::Created {
            kind: R::KIND,
            id: created.id().cloned(),
        });
        self.announce(format!("Created {} record", R::KIND));
        Ok(created)
    }

    /// Validate, PUT the full record, then replace the local copy by id
    pub async fn update<R: Stored>(&self, gateway: &Gateway, record: R) -> StoreResult<R> {
        self.check(&record)?;
        let id = record
            .id()
            .cloned()
            .ok_or(StoreError::MissingId(R::KIND))?;

        let updated = gateway
            .update(&id, &record)
            .await
            .map_err(|e| self.failed("update", R::KIND, e))?;

        self.apply_update(&id, updated.clone()).await;
        self.announce(format!("Updated {} record {}", R::KIND, id));
        Ok(updated)
    }

    /// DELETE remotely, then drop the local copy
    ///
    /// On any failure the local collection is left as it was.
    pub async fn remove<R: Stored>(&self, gateway: &Gateway, id: &RecordId) -> StoreResult<bool> {
        let removed = gateway
            .remove::<R>(id)
            .await
            .map_err(|e| self.failed("remove", R::KIND, e))?;

        if removed {
            let dropped = remove_by_id(R::slot_mut(&mut *self.collections.write().await), id);
            tracing::debug!(entity = %R::KIND, id = %id, dropped, "Record removed");

            self.publish(StoreEvent::Removed {
                kind: R::KIND,
                id: id.clone(),
            });
            self.announce(format!("Removed {} record {}", R::KIND, id));
        }
        Ok(removed)
    }

    /// Flip a bill's claim status remotely and mirror the result
    pub async fn toggle_claim_status(
        &self,
        gateway: &Gateway,
        id: &RecordId,
    ) -> StoreResult<FinancialRecord> {
        let updated = gateway
            .toggle_claim_status(id)
            .await
            .map_err(|e| self.failed("toggle claim status", EntityKind::Financial, e))?;

        self.apply_update(id, updated.clone()).await;

        let claim = updated.claim_status.map(|c| c.label()).unwrap_or("Unknown");
        self.announce(format!("Claim for bill {} is now {}", id, claim));
        Ok(updated)
    }

    async fn apply_update<R: Stored>(&self, id: &RecordId, record: R) {
        let replaced = replace_by_id(R::slot_mut(&mut *self.collections.write().await), id, record);
        if !replaced {
            tracing::debug!(entity = %R::KIND, id = %id, "Updated record was not held locally");
        }

        self.publish(StoreEvent::Updated {
            kind: R::KIND,
            id: id.clone(),
        });
    }

    fn check<R: Stored>(&self, record: &R) -> StoreResult<()> {
        record.validate().map_err(|e| {
            tracing::warn!(entity = %R::KIND, error = %e, "Record rejected before sending");
            if let Some(notifier) = &self.notifier {
                notifier.warning(e.to_string());
            }
            StoreError::from(e)
        })
    }

    fn failed(&self, action: &str, kind: EntityKind, error: GatewayError) -> StoreError {
        if let Some(notifier) = &self.notifier {
            notifier.error(format!("Could not {} {} record: {}", action, kind, error));
        }
        StoreError::from(error)
    }

    fn announce(&self, message: String) {
        if let Some(notifier) = &self.notifier {
            notifier.info(message);
        }
    }

    fn publish(&self, event: StoreEvent) {
        // Nobody listening is not an error
        let _ = self.events.send(event);
    }

    // ========================================================================
    // Selectors
    // ========================================================================

    /// Run `f` against the current contents of one collection
    pub async fn select<R: Stored, T>(&self, f: impl FnOnce(&[R]) -> T) -> T {
        let collections = self.collections.read().await;
        f(R::slot(&collections))
    }

    /// Owned copy of one collection
    pub async fn snapshot<R: Stored>(&self) -> Vec<R> {
        self.select(|records: &[R]| records.to_vec()).await
    }

    pub async fn len<R: Stored>(&self) -> usize {
        self.select(|records: &[R]| records.len()).await
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.snapshot().await
    }

    pub async fn staff(&self) -> Vec<Staff> {
        self.snapshot().await
    }

    pub async fn financial(&self) -> Vec<FinancialRecord> {
        self.snapshot().await
    }

    pub async fn attendance(&self) -> Vec<AttendanceRecord> {
        self.snapshot().await
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.snapshot().await
    }

    /// Build every dashboard panel from the current collections
    ///
    /// The attendance panel is included only when `attendance_date` is given.
    pub async fn dashboard(
        &self,
        today: NaiveDate,
        attendance_date: Option<&str>,
    ) -> DashboardSummary {
        let collections = self.collections.read().await;

        DashboardSummary {
            patients: PatientOverview::from_records(&collections.patients, today),
            staff: StaffOverview::from_records(&collections.staff),
            finance: FinanceOverview::from_records(&collections.financial),
            attendance: attendance_date
                .map(|date| AttendanceOverview::for_date(&collections.attendance, date)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::notify::Severity;
    use crate::records::{AttendanceStatus, ClaimStatus, PatientStatus, PaymentStatus};
    use async_trait::async_trait;

    /// In-memory source; `None` collections fail with a 500
    #[derive(Default)]
    struct FakeSource {
        patients: Option<Vec<Patient>>,
        staff: Option<Vec<Staff>>,
        financial: Option<Vec<FinancialRecord>>,
        attendance: Option<Vec<AttendanceRecord>>,
    }

    fn outcome<R: Clone>(kind: &str, records: &Option<Vec<R>>) -> GatewayResult<Vec<R>> {
        records.clone().ok_or_else(|| GatewayError::Status {
            status: 500,
            url: format!("http://fake/{}", kind),
            message: "Internal Server Error".to_string(),
        })
    }

    #[async_trait]
    impl RecordSource for FakeSource {
        async fn fetch_patients(&self) -> GatewayResult<Vec<Patient>> {
            outcome("patients", &self.patients)
        }

        async fn fetch_staff(&self) -> GatewayResult<Vec<Staff>> {
            outcome("staff", &self.staff)
        }

        async fn fetch_financial(&self) -> GatewayResult<Vec<FinancialRecord>> {
            outcome("financial", &self.financial)
        }

        async fn fetch_attendance(&self) -> GatewayResult<Vec<AttendanceRecord>> {
            outcome("attendance", &self.attendance)
        }

        async fn fetch_transactions(&self) -> GatewayResult<Vec<Transaction>> {
            Ok(Vec::new())
        }
    }

    fn full_source() -> FakeSource {
        FakeSource {
            patients: Some(vec![
                Patient::new("Ada")
                    .with_id("1")
                    .status(PatientStatus::Active)
                    .last_visit("2024-01-10"),
                Patient::new("Bo")
                    .with_id("2")
                    .status(PatientStatus::Inactive)
                    .last_visit("2024-02-03"),
            ]),
            staff: Some(vec![
                Staff::new("Cy").with_id("1").on_duty(true).department("ER"),
                Staff::new("Di").with_id("2").department("ER"),
            ]),
            financial: Some(vec![FinancialRecord::new("2024-01-05", 120.0)
                .with_id("7")
                .payment(PaymentStatus::Paid)
                .claim(ClaimStatus::Pending)]),
            attendance: Some(vec![
                AttendanceRecord::new("1", "Cy", "2024-02-10", AttendanceStatus::Present),
                AttendanceRecord::new("2", "Di", "2024-02-10", AttendanceStatus::Absent),
                AttendanceRecord::new("1", "Cy", "2024-02-09", AttendanceStatus::Present),
            ]),
        }
    }

    #[tokio::test]
    async fn test_load_initial_fills_all_three() {
        let store = RecordStore::new();
        let report = store.load_initial(&full_source()).await;

        assert!(report.is_complete());
        assert_eq!(report.count(EntityKind::Patients), Some(2));
        assert_eq!(store.patients().await.len(), 2);
        assert_eq!(store.staff().await.len(), 2);
        assert_eq!(store.financial().await.len(), 1);
        // Attendance is not part of the initial load
        assert!(store.attendance().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_initial_keeps_successes_when_one_fails() {
        let notifier = Notifier::default();
        let mut notices = notifier.subscribe();
        let store = RecordStore::new().with_notifier(notifier);

        let source = FakeSource {
            staff: None,
            ..full_source()
        };
        let report = store.load_initial(&source).await;

        assert_eq!(report.failed_kinds(), vec![EntityKind::Staff]);
        assert_eq!(store.patients().await.len(), 2);
        assert_eq!(store.financial().await.len(), 1);
        assert!(store.staff().await.is_empty());

        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.message.contains("staff"));
    }

    #[tokio::test]
    async fn test_load_publishes_events() {
        let store = RecordStore::new();
        let mut events = store.subscribe();

        let count = store.load_attendance(&full_source()).await.unwrap();
        assert_eq!(count, 3);

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            StoreEvent::Loaded {
                kind: EntityKind::Attendance,
                count: 3
            }
        );
    }

    #[tokio::test]
    async fn test_single_load_failure_propagates() {
        let store = RecordStore::new();
        let source = FakeSource::default();

        let err = store.load(&source, EntityKind::Patients).await.unwrap_err();
        assert!(matches!(err, StoreError::Gateway(GatewayError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_select() {
        let store = RecordStore::new();
        store.load_initial(&full_source()).await;

        let on_duty = store
            .select(|staff: &[Staff]| staff.iter().filter(|s| s.on_duty).count())
            .await;
        assert_eq!(on_duty, 1);
        assert_eq!(store.len::<Patient>().await, 2);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let store = RecordStore::new();
        let source = full_source();
        store.load_initial(&source).await;
        store.load_attendance(&source).await.unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let summary = store.dashboard(today, Some("2024-02-10")).await;

        assert_eq!(summary.patients.total, 2);
        assert_eq!(summary.staff.on_duty, 1);
        let attendance = summary.attendance.unwrap();
        assert_eq!(attendance.present, 1);
        assert_eq!(attendance.absent, 1);

        let without = store.dashboard(today, None).await;
        assert!(without.attendance.is_none());
    }

    #[tokio::test]
    async fn test_invalid_record_never_reaches_gateway() {
        // Unroutable gateway: validation must fail before any request
        let gateway = Gateway::new(ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();
        let store = RecordStore::new();

        let err = store.create(&gateway, Patient::new("  ")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.patients().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_without_id() {
        let gateway = Gateway::new(ApiConfig::with_base_url("http://127.0.0.1:9")).unwrap();
        let store = RecordStore::new();

        let err = store.update(&gateway, Staff::new("Cy")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingId(EntityKind::Staff)));
    }
}
