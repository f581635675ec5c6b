//! 가격 CSV 파일 읽기/쓰기.
//!
//! 형식은 `date,close` 헤더가 있는 CSV입니다. `close` 헤더가 있으면 다른 열이
//! 더 있어도 됩니다 (`date,open,high,low,close,volume` 등). 잘못된 행은 건너뛰지
//! 않고 줄 번호와 함께 에러로 보고합니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dca_core::{DcaError, DcaResult, PricePoint, PriceSeries};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// CSV 문자열을 가격 시계열로 파싱합니다.
///
/// 빈 줄은 무시합니다. 날짜는 `YYYY-MM-DD`이어야 하고 시계열 순서로
/// 정렬되어 있어야 합니다.
pub fn parse_prices_csv(content: &str) -> DcaResult<PriceSeries> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| DcaError::Parse("가격 파일이 비어 있습니다".to_string()))?;
    let (date_col, close_col) = header_columns(header)?;
    let width = date_col.max(close_col) + 1;

    let mut points = Vec::new();
    for (line_no, line) in lines {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < width {
            return Err(DcaError::Parse(format!(
                "{}번째 줄: 열이 부족합니다 ({}개, 최소 {}개 필요)",
                line_no,
                parts.len(),
                width
            )));
        }

        let date = NaiveDate::parse_from_str(parts[date_col], "%Y-%m-%d").map_err(|e| {
            DcaError::Parse(format!(
                "{}번째 줄: 잘못된 날짜 '{}': {}",
                line_no, parts[date_col], e
            ))
        })?;
        let close = Decimal::from_str(parts[close_col]).map_err(|e| {
            DcaError::Parse(format!(
                "{}번째 줄: 잘못된 종가 '{}': {}",
                line_no, parts[close_col], e
            ))
        })?;

        points.push(PricePoint::new(date, close)?);
    }

    PriceSeries::new(points)
}

fn header_columns(header: &str) -> DcaResult<(usize, usize)> {
    let columns: Vec<String> = header
        .split(',')
        .map(|c| c.trim().to_ascii_lowercase())
        .collect();
    let find = |name: &str| columns.iter().position(|c| c == name);

    match (find("date"), find("close")) {
        (Some(date), Some(close)) => Ok((date, close)),
        _ => Err(DcaError::Parse(format!(
            "CSV 헤더에 date, close 열이 필요합니다: '{}'",
            header
        ))),
    }
}

/// 가격 CSV 파일을 읽습니다.
pub fn load_prices(path: &Path) -> Result<PriceSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read price file: {}", path.display()))?;
    let series = parse_prices_csv(&content)
        .with_context(|| format!("Invalid price file: {}", path.display()))?;

    info!(
        path = %path.display(),
        points = series.len(),
        "Loaded price series"
    );
    Ok(series)
}

/// 가격 시계열을 `date,close` CSV로 저장합니다.
pub fn save_prices(path: &Path, series: &PriceSeries) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "date,close")?;
    for point in series {
        writeln!(writer, "{},{}", point.date.format("%Y-%m-%d"), point.price)?;
    }
    writer.flush()?;

    info!("Saved {} prices to {}", series.len(), path.display());

    Ok(series.len())
}
