//! Dashboard Overviews
//!
//! Per-entity summaries composed from the aggregation primitives. Each
//! overview holds exactly what one dashboard panel charts.

use super::aggregate::{
    group_count, group_sum, monthly_series_with, percentage, MonthlySeries, Tally,
};
use super::filter::by_exact_date;
use crate::records::{
    date_portion, AttendanceRecord, AttendanceStatus, FinancialRecord, Patient, PaymentStatus,
    Staff,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Patient panel: status pie, demographics and visit trend
#[derive(Debug, Clone, Serialize)]
pub struct PatientOverview {
    pub total: usize,
    pub by_status: Tally<usize>,
    pub active_percentage: f64,
    pub by_gender: Tally<usize>,
    pub by_blood_group: Tally<usize>,
    /// Patients with an appointment on or after the reference date
    pub upcoming_appointments: usize,
    /// Monthly visits: all patients vs active patients
    pub visits: MonthlySeries,
}

impl PatientOverview {
    pub fn from_records(patients: &[Patient], today: NaiveDate) -> Self {
        let by_status = group_count(patients, |p| p.status);
        let active = patients.iter().filter(|p| p.is_active()).count();

        let upcoming_appointments = patients
            .iter()
            .filter_map(|p| p.next_appointment.as_deref().and_then(parse_date))
            .filter(|date| *date >= today)
            .count();

        Self {
            total: patients.len(),
            by_status,
            active_percentage: percentage(active as f64, patients.len() as f64),
            by_gender: group_count(patients, |p| p.gender.as_deref()),
            by_blood_group: group_count(patients, |p| p.blood_group.as_deref()),
            upcoming_appointments,
            visits: monthly_series_with(patients, |p| p.last_visit.as_deref(), |p| p.is_active()),
        }
    }
}

/// Staff panel: duty split, departments and shifts
#[derive(Debug, Clone, Serialize)]
pub struct StaffOverview {
    pub total: usize,
    pub on_duty: usize,
    pub off_duty: usize,
    pub on_duty_percentage: f64,
    pub by_department: Tally<usize>,
    pub by_shift: Tally<usize>,
    pub salary_by_department: Tally<f64>,
}

impl StaffOverview {
    pub fn from_records(staff: &[Staff]) -> Self {
        let on_duty = staff.iter().filter(|s| s.on_duty).count();

        Self {
            total: staff.len(),
            on_duty,
            off_duty: staff.len() - on_duty,
            on_duty_percentage: percentage(on_duty as f64, staff.len() as f64),
            by_department: group_count(staff, |s| s.department.as_deref()),
            by_shift: group_count(staff, |s| s.shift.as_deref()),
            salary_by_department: group_sum(staff, |s| s.department.as_deref(), |s| s.salary),
        }
    }

    /// Duty split labelled the way the duty chart shows it
    pub fn duty_labels(&self) -> [(&'static str, usize); 2] {
        [("On Duty", self.on_duty), ("Off Duty", self.off_duty)]
    }
}

/// Finance panel: payment totals, claim states and billing trend
#[derive(Debug, Clone, Serialize)]
pub struct FinanceOverview {
    pub total_records: usize,
    pub billed_total: f64,
    pub amount_by_payment: Tally<f64>,
    pub by_claim: Tally<usize>,
    /// Share of the billed amount that has been paid
    pub collected_percentage: f64,
    /// Monthly bills: all vs paid
    pub billing: MonthlySeries,
}

impl FinanceOverview {
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let amount_by_payment = group_sum(records, |r| r.payment_status, |r| r.amount);
        let billed_total: f64 = amount_by_payment.values().sum();
        let paid_total = amount_by_payment
            .get(PaymentStatus::Paid.label())
            .copied()
            .unwrap_or(0.0);

        Self {
            total_records: records.len(),
            billed_total,
            amount_by_payment,
            by_claim: group_count(records, |r| r.claim_status),
            collected_percentage: percentage(paid_total, billed_total),
            billing: monthly_series_with(
                records,
                |r| r.bill_date.as_deref(),
                |r| r.payment_status == Some(PaymentStatus::Paid),
            ),
        }
    }
}

/// Attendance panel for one day
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceOverview {
    pub date: String,
    pub present: usize,
    pub absent: usize,
    pub by_status: Tally<usize>,
    pub attendance_percentage: f64,
}

impl AttendanceOverview {
    pub fn for_date(records: &[AttendanceRecord], date: &str) -> Self {
        let day = by_exact_date(records, |r| r.date.as_deref(), date);

        let by_status = group_count(&day, |r| r.status);
        let present = by_status
            .get(AttendanceStatus::Present.label())
            .copied()
            .unwrap_or(0);
        let absent = by_status
            .get(AttendanceStatus::Absent.label())
            .copied()
            .unwrap_or(0);

        Self {
            date: date_portion(date).to_string(),
            present,
            absent,
            by_status,
            attendance_percentage: percentage(present as f64, day.len() as f64),
        }
    }
}

/// Everything the dashboard home screen shows
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub patients: PatientOverview,
    pub staff: StaffOverview,
    pub finance: FinanceOverview,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceOverview>,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_portion(value), "%Y-%m-%d").ok()
}
