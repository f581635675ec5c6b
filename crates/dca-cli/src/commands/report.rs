//! 시뮬레이션 결과 출력 및 저장.
//!
//! 금액은 소수점 2자리 통화, 수량은 6자리, 퍼센트는 2자리로 표시합니다.

use anyhow::Result;
use dca_analytics::{Ledger, SimulationReport, Summary};
use dca_core::DecimalExt;
use std::fmt::Write as _;
use std::path::Path;

/// 원장을 회차별 표로 렌더링합니다.
pub fn render_ledger(ledger: &Ledger) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<10} | {:>14} | {:>14} | {:>16} | {:>14} | {:>16} | {:>9} | {:>14}",
        "날짜", "단가", "매수 수량", "누적 수량", "누적 투자금", "평가 금액", "수익률", "평균 매입가"
    );
    let _ = writeln!(out, "  {}", "─".repeat(130));

    for entry in ledger {
        let _ = writeln!(
            out,
            "  {:<10} | {:>14} | {:>14.6} | {:>16.6} | {:>14} | {:>16} | {:>9} | {:>14}",
            entry.date.format("%Y-%m-%d"),
            entry.unit_price.to_currency_string(),
            entry.units_acquired.round_half_up(6),
            entry.cumulative_units.round_half_up(6),
            entry.cumulative_invested.to_currency_string(),
            entry.current_value.to_currency_string(),
            entry.roi_pct.to_percent_string(),
            entry.average_cost.to_currency_string()
        );
    }

    out
}

/// 요약 통계를 렌더링합니다.
pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  기간:          {} ~ {} ({}회, {}년)",
        summary.first_date, summary.last_date, summary.periods, summary.years_span
    );
    let _ = writeln!(out, "  총 투자금:     {}", summary.total_invested.to_currency_string());
    let _ = writeln!(out, "  보유 수량:     {:.6}", summary.final_units.round_half_up(6));
    let _ = writeln!(out, "  평가 금액:     {}", summary.final_value.to_currency_string());
    let _ = writeln!(out, "  평가 손익:     {}", summary.net_profit.to_currency_string());
    let _ = writeln!(out, "  평균 매입가:   {}", summary.average_cost.to_currency_string());
    let _ = writeln!(out, "  수익률(ROI):   {}", summary.roi_pct.to_percent_string());
    let _ = writeln!(out, "  CAGR:          {}", summary.cagr_pct.to_percent_string());
    let _ = writeln!(out, "  최대 낙폭:     {}", summary.max_drawdown_pct.to_percent_string());
    let _ = writeln!(out, "  최근 낙폭:     {}", summary.latest_drawdown_pct.to_percent_string());
    out
}

/// 전체 보고서를 텍스트로 렌더링합니다.
pub fn render_report(report: &SimulationReport) -> String {
    let params = &report.params;
    let mut out = String::new();

    let _ = writeln!(out, "\n📊 DCA 시뮬레이션 결과");
    let _ = writeln!(out, "{}", "═".repeat(63));
    let _ = writeln!(
        out,
        "  요청 기간: {} ~ {} | 회차당 적립액: {}",
        params.start_date,
        params.end_date,
        params.contribution_amount.to_currency_string()
    );
    let _ = writeln!(out);
    out.push_str(&render_ledger(&report.ledger));
    let _ = writeln!(out);
    out.push_str(&render_summary(&report.summary));
    let _ = writeln!(out, "{}", "═".repeat(63));

    out
}

/// 보고서를 터미널에 출력합니다.
pub fn print_report(report: &SimulationReport) {
    print!("{}", render_report(report));
}

/// 보고서를 파일로 저장합니다.
///
/// 확장자가 `.json`이면 매개변수/원장/요약 전체를 JSON으로, 그 외에는 텍스트
/// 보고서를 저장합니다.
pub fn save_report(report: &SimulationReport, path: &Path) -> Result<()> {
    // 디렉토리 생성
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::to_string_pretty(report)?
    } else {
        render_report(report)
    };

    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dca_analytics::SimulationEngine;
    use dca_core::{PricePoint, PriceSeries, SimulationParams};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_report() -> SimulationReport {
        let series = PriceSeries::new(vec![
            PricePoint::new(date(2021, 1, 1), dec!(100)).unwrap(),
            PricePoint::new(date(2021, 2, 1), dec!(200)).unwrap(),
            PricePoint::new(date(2021, 3, 1), dec!(50)).unwrap(),
        ])
        .unwrap();
        let params = SimulationParams::new(date(2021, 1, 1), date(2021, 3, 31), dec!(100)).unwrap();
        SimulationEngine::new(params).run(&series).unwrap()
    }

    #[test]
    fn test_render_ledger_formats_values() {
        let table = render_ledger(&create_report().ledger);

        assert_eq!(table.lines().count(), 2 + 3);
        assert!(table.contains("2021-02-01"));
        assert!(table.contains("$200.00"));
        assert!(table.contains("0.500000"));
        assert!(table.contains("-41.67%"));
        // 회차별 평균 매입가
        let february = table.lines().find(|l| l.contains("2021-02-01")).unwrap();
        assert!(february.trim_end().ends_with("$133.33"));
        let march = table.lines().find(|l| l.contains("2021-03-01")).unwrap();
        assert!(march.trim_end().ends_with("$85.71"));
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&create_report().summary);

        assert!(text.contains("$300.00"));
        assert!(text.contains("$175.00"));
        assert!(text.contains("-$125.00"));
        assert!(text.contains("3.500000"));
        assert!(text.contains("$85.71"));
        assert!(text.contains("75.00%"));
    }

    #[test]
    fn test_save_json_report() {
        let path = std::env::temp_dir().join(format!("dca_report_{}.json", std::process::id()));
        save_report(&create_report(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["summary"]["periods"], 3);
        assert_eq!(json["ledger"]["contribution_amount"], "100");
    }
}
