//! DCA 시뮬레이터 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 가격 CSV 읽기/쓰기
//! - Yahoo Finance 일별 종가 다운로드
//! - 시뮬레이션 실행과 보고서 출력

pub mod commands;

pub use commands::*;
