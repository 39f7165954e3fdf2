//! 사이트 특성 및 도메인 상수들
//!
//! BOOTH 샵 페이지의 고유한 특성들과 갤러리 도메인 상수들을 정의합니다.

/// BOOTH 사이트 특성 상수들
pub mod site {
    /// Referer sent with every listing request
    pub const REFERER: &str = "https://booth.pm/";

    /// 참조 배포의 샵 목록 (이름, 목록 URL) - 순서가 응답 순서를 결정합니다
    pub const DEFAULT_SHOPS: &[(&str, &str)] = &[
        ("hentai365", "https://hentai365.booth.pm/"),
        ("hentai366", "https://hentai366.booth.pm/"),
        ("hentai367", "https://hentai367.booth.pm/"),
    ];

    /// Markers of the anti-automation interstitial; both must be present
    pub const CHALLENGE_VENDOR_MARKER: &str = "Cloudflare";
    pub const CHALLENGE_PHRASE: &str = "security challenge";
}

/// 카탈로그 관련 상수들
pub mod catalog {
    /// 카테고리가 없는 상품에 붙는 기본 태그 ("Illustration")
    pub const DEFAULT_TAG: &str = "イラスト";

    /// 폴백 상품의 이미지 자리표시자
    pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=300&width=300";

    /// 폴백 랜덤 ID 길이
    pub const FALLBACK_ID_LEN: usize = 6;
}

/// 크롤링 관련 기본 제한값들
pub mod crawling {
    /// 기본 요청 타임아웃 (초)
    pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// 기본 초당 요청 수 (0 = 제한 없음)
    pub const DEFAULT_MAX_REQUESTS_PER_SECOND: u32 = 0;

    /// TTL 관련 기본값들
    pub mod ttl {
        /// 전체 상품 목록 캐시 TTL (분)
        pub const AGGREGATE_CACHE_TTL_MINUTES: u64 = 15;
    }
}
