// ============================================================================
// CALENDAR - Cuadrícula mensual a partir de la fecha del evento
// ============================================================================

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;

/// Mes en semanas de 7 celdas, empezando en domingo
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// `None` = celda vacía antes del día 1 o después del último
    pub weeks: Vec<[Option<u32>; 7]>,
    pub highlighted_day: u32,
}

/// Acepta `YYYY-MM-DD` o una marca RFC 3339
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

impl MonthGrid {
    pub fn for_date(date: NaiveDate) -> Self {
        let (year, month) = (date.year(), date.month());
        let lead = date
            .with_day(1)
            .map(|first| first.weekday().num_days_from_sunday())
            .unwrap_or(0) as usize;
        let total = days_in_month(year, month);

        let mut cells: Vec<Option<u32>> = vec![None; lead];
        cells.extend((1..=total).map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        let weeks = cells
            .chunks(7)
            .map(|week| {
                let mut row = [None; 7];
                row.copy_from_slice(week);
                row
            })
            .collect();

        Self {
            year,
            month,
            weeks,
            highlighted_day: date.day(),
        }
    }
}

/// Días restantes hasta el evento (negativo si ya pasó)
pub fn days_until(event_date: NaiveDate, today: NaiveDate) -> i64 {
    event_date.signed_duration_since(today).num_days()
}
