//! Derived attendance metrics for a single subject.
//!
//! Every function here is a pure transform over a snapshot of facts: no I/O,
//! no shared state, and no failure modes. Empty input yields zero-valued or
//! empty aggregates.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::fact::{AttendanceFact, MonthFilter, Student};
use crate::percentage::{Percentage, Tally};

/// Students strictly below this percentage are defaulters.
pub const DEFAULTER_THRESHOLD: u64 = 75;
/// Defaulters strictly below this percentage are critical.
pub const CRITICAL_THRESHOLD: u64 = 60;
/// Lower bound of the top distribution bucket.
pub const EXCELLENT_THRESHOLD: u64 = 90;
/// Number of students reported as top performers.
pub const TOP_PERFORMER_LIMIT: usize = 5;

/// Headline numbers for a subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Enrolled students, including those with no recorded days.
    #[schema(example = 60)]
    pub total_students: u64,
    /// Distinct dates with at least one recorded fact.
    #[schema(example = 24)]
    pub classes_held: u64,
    /// Mean attendance across all facts.
    #[schema(value_type = String, example = "81.25")]
    pub average_attendance: Percentage,
    /// Students whose attendance is below the defaulter threshold.
    #[schema(example = 7)]
    pub defaulters_count: u64,
}

/// Attendance percentage on one date.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DailyTrend {
    pub date: NaiveDate,
    #[schema(value_type = String, example = "87.50")]
    pub percentage: Percentage,
}

/// Label attached to a ranked student.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Good,
    Low,
    Critical,
}

/// A student's attendance within a subject, with a status label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    #[schema(example = 7)]
    pub student_id: i32,
    /// `None` when the student is not on the subject's roster.
    #[schema(example = "Asha Patil")]
    pub name: Option<String>,
    #[schema(example = "21")]
    pub roll_no: Option<String>,
    #[schema(value_type = String, example = "92.31")]
    pub percentage: Percentage,
    pub status: Standing,
}

/// Per-student attendance ranges used by the distribution chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Excellent,
    Satisfactory,
    Borderline,
    Critical,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Self::Excellent,
        Self::Satisfactory,
        Self::Borderline,
        Self::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "90-100",
            Self::Satisfactory => "75-89",
            Self::Borderline => "60-74",
            Self::Critical => "<60",
        }
    }

    fn classify(tally: &Tally) -> Self {
        if !tally.is_below(EXCELLENT_THRESHOLD) {
            Self::Excellent
        } else if !tally.is_below(DEFAULTER_THRESHOLD) {
            Self::Satisfactory
        } else if !tally.is_below(CRITICAL_THRESHOLD) {
            Self::Borderline
        } else {
            Self::Critical
        }
    }
}

/// Number of students in one distribution bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DistributionEntry {
    #[schema(example = "90-100")]
    pub range: String,
    #[schema(example = 12)]
    pub count: u64,
}

/// Present/absent counts for one ISO week.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct WeeklyTrend {
    /// ISO week-numbering year.
    #[schema(example = 2024)]
    pub year: i32,
    /// ISO week number (1-53).
    #[schema(example = 3)]
    pub week: u32,
    #[schema(example = 140)]
    pub present: u64,
    #[schema(example = 20)]
    pub absent: u64,
}

/// A defaulter within one calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDefaulter {
    #[schema(example = 7)]
    pub student_id: i32,
    #[schema(example = 9)]
    pub present_days: u64,
    #[schema(example = 16)]
    pub total_days: u64,
    #[schema(value_type = String, example = "56.25")]
    pub attendance_percentage: Percentage,
}

/// Everything the analytics dashboard shows for one subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAnalytics {
    pub overall_stats: OverallStats,
    pub attendance_trends: Vec<DailyTrend>,
    pub top_performers: Vec<StudentStanding>,
    pub defaulters: Vec<StudentStanding>,
    pub attendance_distribution: Vec<DistributionEntry>,
    pub weekly_trends: Vec<WeeklyTrend>,
}

/// Compute every subject metric from one snapshot of facts.
///
/// `facts` must belong to a single subject. With a `month` filter only facts
/// dated inside that month are considered; `enrolled` is never filtered.
pub fn analyze(
    facts: &[AttendanceFact],
    enrolled: &[Student],
    month: Option<MonthFilter>,
) -> SubjectAnalytics {
    let facts = scope(facts, month);
    SubjectAnalytics {
        overall_stats: overall_stats(&facts, enrolled),
        attendance_trends: attendance_trends(&facts),
        top_performers: top_performers(&facts, enrolled),
        defaulters: defaulters(&facts, enrolled),
        attendance_distribution: attendance_distribution(&facts),
        weekly_trends: weekly_trends(&facts),
    }
}

pub fn overall_stats(facts: &[AttendanceFact], enrolled: &[Student]) -> OverallStats {
    let mut all = Tally::default();
    let mut dates = BTreeSet::new();
    for fact in facts {
        all.record(fact.present);
        dates.insert(fact.date);
    }

    let defaulters_count = tally_by_student(facts)
        .values()
        .filter(|t| t.is_below(DEFAULTER_THRESHOLD))
        .count() as u64;

    OverallStats {
        total_students: enrolled.len() as u64,
        classes_held: dates.len() as u64,
        average_attendance: all.percentage().unwrap_or(Percentage::ZERO),
        defaulters_count,
    }
}

/// Daily attendance percentages, oldest first. Dates without facts are omitted.
pub fn attendance_trends(facts: &[AttendanceFact]) -> Vec<DailyTrend> {
    let mut by_date: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for fact in facts {
        by_date.entry(fact.date).or_default().record(fact.present);
    }
    by_date
        .into_iter()
        .filter_map(|(date, tally)| {
            tally
                .percentage()
                .map(|percentage| DailyTrend { date, percentage })
        })
        .collect()
}

/// The best-attending students, highest first; ties go to the lower student ID.
pub fn top_performers(
    facts: &[AttendanceFact],
    enrolled: &[Student],
) -> Vec<StudentStanding> {
    let roster = roster_index(enrolled);
    let mut ranked: Vec<(i32, Tally)> = tally_by_student(facts).into_iter().collect();
    ranked.sort_by(|(a_id, a), (b_id, b)| b.cmp_ratio(a).then(a_id.cmp(b_id)));

    ranked
        .into_iter()
        .take(TOP_PERFORMER_LIMIT)
        .map(|(id, tally)| {
            let status = if tally.is_below(DEFAULTER_THRESHOLD) {
                Standing::Low
            } else {
                Standing::Good
            };
            standing(id, &tally, status, &roster)
        })
        .collect()
}

/// Every student below the defaulter threshold, worst first.
pub fn defaulters(facts: &[AttendanceFact], enrolled: &[Student]) -> Vec<StudentStanding> {
    let roster = roster_index(enrolled);
    below_threshold(facts)
        .into_iter()
        .map(|(id, tally)| {
            let status = if tally.is_below(CRITICAL_THRESHOLD) {
                Standing::Critical
            } else {
                Standing::Low
            };
            standing(id, &tally, status, &roster)
        })
        .collect()
}

/// Students per attendance range, in bucket order. Empty buckets are omitted.
///
/// Only students with at least one fact are counted.
pub fn attendance_distribution(facts: &[AttendanceFact]) -> Vec<DistributionEntry> {
    let mut counts: BTreeMap<Bucket, u64> = BTreeMap::new();
    for tally in tally_by_student(facts).values() {
        *counts.entry(Bucket::classify(tally)).or_default() += 1;
    }
    Bucket::ALL
        .iter()
        .filter_map(|bucket| {
            counts.get(bucket).map(|&count| DistributionEntry {
                range: bucket.label().to_string(),
                count,
            })
        })
        .collect()
}

/// Present/absent counts per ISO week, in calendar order.
pub fn weekly_trends(facts: &[AttendanceFact]) -> Vec<WeeklyTrend> {
    let mut by_week: BTreeMap<(i32, u32), Tally> = BTreeMap::new();
    for fact in facts {
        let week = fact.date.iso_week();
        by_week
            .entry((week.year(), week.week()))
            .or_default()
            .record(fact.present);
    }
    by_week
        .into_iter()
        .map(|((year, week), tally)| WeeklyTrend {
            year,
            week,
            present: tally.present,
            absent: tally.absent(),
        })
        .collect()
}

/// Defaulters within one calendar month, worst first.
pub fn monthly_defaulters(
    facts: &[AttendanceFact],
    month: MonthFilter,
) -> Vec<MonthlyDefaulter> {
    let facts = scope(facts, Some(month));
    below_threshold(&facts)
        .into_iter()
        .map(|(student_id, tally)| MonthlyDefaulter {
            student_id,
            present_days: tally.present,
            total_days: tally.total,
            attendance_percentage: tally.percentage().unwrap_or(Percentage::ZERO),
        })
        .collect()
}

fn scope(facts: &[AttendanceFact], month: Option<MonthFilter>) -> Cow<'_, [AttendanceFact]> {
    match month {
        Some(m) => Cow::Owned(facts.iter().filter(|f| m.contains(f.date)).cloned().collect()),
        None => Cow::Borrowed(facts),
    }
}

fn tally_by_student(facts: &[AttendanceFact]) -> BTreeMap<i32, Tally> {
    let mut by_student: BTreeMap<i32, Tally> = BTreeMap::new();
    for fact in facts {
        by_student
            .entry(fact.student_id)
            .or_default()
            .record(fact.present);
    }
    by_student
}

/// Students below the defaulter threshold, ascending by ratio then ID.
fn below_threshold(facts: &[AttendanceFact]) -> Vec<(i32, Tally)> {
    let mut rows: Vec<(i32, Tally)> = tally_by_student(facts)
        .into_iter()
        .filter(|(_, t)| t.is_below(DEFAULTER_THRESHOLD))
        .collect();
    rows.sort_by(|(a_id, a), (b_id, b)| a.cmp_ratio(b).then(a_id.cmp(b_id)));
    rows
}

fn roster_index(enrolled: &[Student]) -> HashMap<i32, &Student> {
    enrolled.iter().map(|s| (s.id, s)).collect()
}

fn standing(
    student_id: i32,
    tally: &Tally,
    status: Standing,
    roster: &HashMap<i32, &Student>,
) -> StudentStanding {
    let student = roster.get(&student_id);
    StudentStanding {
        student_id,
        name: student.map(|s| s.name.clone()),
        roll_no: student.map(|s| s.roll_no.clone()),
        percentage: tally.percentage().unwrap_or(Percentage::ZERO),
        status,
    }
}
