//! # DCA Core
//!
//! 적립식 투자(DCA) 시뮬레이터의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 시뮬레이션 엔진과 CLI가 공유하는 기본 타입을 제공합니다:
//! - 가격 포인트 및 가격 시계열
//! - 금액/수량 타입과 Decimal 유틸리티
//! - 에러 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
