//! Bilingual text variant generation
//!
//! Korean/English keyword pairs let one description match either rendering
//! of the same control. Each keyword found in the description expands into
//! additional text patterns for the text and label stages.

use once_cell::sync::Lazy;

static KEYWORD_VARIANTS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        ("로그인", &["Login", "Sign In", "입장"] as &[_]),
        ("로그아웃", &["Logout", "Sign Out"]),
        ("삭제", &["Delete", "Remove", "제거"]),
        ("저장", &["Save", "Submit"]),
        ("생성", &["Create", "Add", "New", "추가"]),
        ("취소", &["Cancel", "Close", "닫기"]),
        ("검색", &["Search", "찾기"]),
        ("수정", &["Edit", "Update", "변경"]),
        ("확인", &["Confirm", "OK", "Ok"]),
        ("회원", &["Members", "Users", "사용자"]),
        ("설정", &["Settings", "환경설정"]),
        ("이메일", &["Email", "E-mail"]),
        ("비밀번호", &["Password", "패스워드"]),
        ("login", &["로그인", "Sign In"]),
        ("delete", &["삭제", "Remove"]),
        ("save", &["저장", "Submit"]),
        ("search", &["검색", "찾기"]),
        ("cancel", &["취소", "Close"]),
        ("email", &["이메일"]),
        ("password", &["비밀번호"]),
    ]
});

/// Description plus every variant triggered by a keyword it contains.
/// The description itself is always the first pattern.
pub fn text_variants(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut patterns = vec![description.trim().to_string()];

    for (keyword, variants) in KEYWORD_VARIANTS.iter() {
        if lower.contains(keyword) {
            for variant in *variants {
                let candidate = variant.to_string();
                if !patterns.iter().any(|p| p.eq_ignore_ascii_case(&candidate)) {
                    patterns.push(candidate);
                }
            }
        }
    }
    patterns
}
