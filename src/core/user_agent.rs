use crate::domain::model::{
    BrowserInfo, ClientDescriptor, CpuInfo, DeviceInfo, EngineInfo, OsInfo, UNKNOWN,
};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;

/// Longer headers are only inspected up to this many bytes.
const MAX_UA_LENGTH: usize = 512;

pub async fn user_agent(headers: HeaderMap) -> Json<ClientDescriptor> {
    let raw = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    Json(parse_user_agent(raw))
}

/// Best-effort decomposition of a `User-Agent` value. Never fails; anything
/// that cannot be recognized is reported as [`UNKNOWN`].
///
/// Aims at the popular browsers, platforms and command-line clients rather
/// than complete coverage.
pub fn parse_user_agent(raw: &str) -> ClientDescriptor {
    let inspected = if raw.len() > MAX_UA_LENGTH {
        raw.get(..MAX_UA_LENGTH).unwrap_or_default()
    } else {
        raw
    };
    let ua = Ua::new(inspected);

    let (browser_name, browser_version) = ua.browser();
    let major = browser_version
        .as_deref()
        .and_then(|v| v.split('.').next())
        .map(str::to_string);
    let (engine_name, engine_version) = ua.engine(browser_name.as_deref());
    let (os_name, os_version) = ua.os();
    let (vendor, model, kind) = ua.device(os_name.as_deref());

    ClientDescriptor {
        ua: raw.to_string(),
        browser: BrowserInfo {
            name: or_unknown(browser_name),
            version: or_unknown(browser_version),
            major: or_unknown(major),
        },
        engine: EngineInfo {
            name: or_unknown(engine_name),
            version: or_unknown(engine_version),
        },
        os: OsInfo {
            name: or_unknown(os_name),
            version: or_unknown(os_version),
        },
        device: DeviceInfo {
            vendor: or_unknown(vendor),
            model: or_unknown(model),
            kind: or_unknown(kind),
        },
        cpu: CpuInfo {
            architecture: or_unknown(ua.cpu()),
        },
    }
}

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

type Pair = (Option<String>, Option<String>);

struct Ua<'a> {
    raw: &'a str,
    // ASCII-lowercased copy; byte offsets match `raw`.
    lower: String,
}

impl<'a> Ua<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_ascii_lowercase(),
        }
    }

    fn has(&self, token: &str) -> bool {
        self.lower.contains(token)
    }

    fn has_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.has(t))
    }

    /// Dotted version directly following `token`; `_` separators become `.`.
    fn version_after(&self, token: &str) -> Option<String> {
        let start = self.lower.find(token)? + token.len();
        let version: String = self.raw[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '_')
            .map(|c| if c == '_' { '.' } else { c })
            .collect();
        let version = version.trim_end_matches('.');
        (!version.is_empty()).then(|| version.to_string())
    }

    fn named(name: &str, version: Option<String>) -> Pair {
        (Some(name.to_string()), version)
    }

    fn browser(&self) -> Pair {
        if let Some(token) = ["edg/", "edge/", "edga/", "edgios/"]
            .into_iter()
            .find(|t| self.has(t))
        {
            return Self::named("Edge", self.version_after(token));
        }
        if self.has("opr/") {
            return Self::named("Opera", self.version_after("opr/"));
        }
        if self.has("opera") {
            let version = self
                .version_after("version/")
                .or_else(|| self.version_after("opera/"));
            return Self::named("Opera", version);
        }
        if self.has("samsungbrowser/") {
            return Self::named("Samsung Internet", self.version_after("samsungbrowser/"));
        }
        if self.has("yabrowser/") {
            return Self::named("Yandex", self.version_after("yabrowser/"));
        }
        if self.has("vivaldi/") {
            return Self::named("Vivaldi", self.version_after("vivaldi/"));
        }
        if self.has("fxios/") {
            return Self::named("Firefox", self.version_after("fxios/"));
        }
        if self.has("firefox/") {
            return Self::named("Firefox", self.version_after("firefox/"));
        }
        if self.has("crios/") {
            return Self::named("Chrome", self.version_after("crios/"));
        }
        if self.has("chromium/") {
            return Self::named("Chromium", self.version_after("chromium/"));
        }
        if self.has("chrome/") {
            return Self::named("Chrome", self.version_after("chrome/"));
        }
        if self.has("msie ") {
            return Self::named("IE", self.version_after("msie "));
        }
        if self.has("trident/") {
            return Self::named("IE", self.version_after("rv:"));
        }
        if self.has("safari/") {
            let name = if self.has("mobile") {
                "Mobile Safari"
            } else {
                "Safari"
            };
            return Self::named(name, self.version_after("version/"));
        }

        self.product_token()
    }

    /// Leading `Name/version` token, as sent by command-line clients and libraries.
    fn product_token(&self) -> Pair {
        let first = self.raw.split_whitespace().next().unwrap_or_default();
        let (name, version) = match first.split_once('/') {
            Some(pair) => pair,
            None => return (None, None),
        };
        if name.is_empty() || name.eq_ignore_ascii_case("mozilla") {
            return (None, None);
        }

        let version: String = version
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
            .collect();
        (Some(name.to_string()), (!version.is_empty()).then_some(version))
    }

    fn engine(&self, browser: Option<&str>) -> Pair {
        if self.has("edge/") {
            return Self::named("EdgeHTML", self.version_after("edge/"));
        }
        if self.has("trident/") {
            return Self::named("Trident", self.version_after("trident/"));
        }
        if self.has("presto/") {
            return Self::named("Presto", self.version_after("presto/"));
        }
        if self.has("applewebkit/") {
            if self.has("chrome/") {
                return Self::named("Blink", self.version_after("chrome/"));
            }
            return Self::named("WebKit", self.version_after("applewebkit/"));
        }
        if self.has("gecko/") && (self.has("rv:") || browser == Some("Firefox")) {
            return Self::named("Gecko", self.version_after("rv:"));
        }
        (None, None)
    }

    fn os(&self) -> Pair {
        if self.has("windows phone") {
            return Self::named("Windows Phone", self.version_after("windows phone "));
        }
        if self.has("windows") {
            let version = self
                .version_after("windows nt ")
                .map(|nt| windows_release(&nt));
            return Self::named("Windows", version);
        }
        if self.has_any(&["iphone", "ipad", "ipod"]) {
            let version = self
                .version_after("iphone os ")
                .or_else(|| self.version_after("cpu os "));
            return Self::named("iOS", version);
        }
        if self.has("android") {
            return Self::named("Android", self.version_after("android "));
        }
        if self.has("cros ") {
            return Self::named("Chrome OS", self.chrome_os_version());
        }
        if self.has("mac os x") {
            return Self::named("Mac OS", self.version_after("mac os x "));
        }
        if self.has("ubuntu") {
            return Self::named("Ubuntu", self.version_after("ubuntu/"));
        }
        if self.has("fedora") {
            return Self::named("Fedora", self.version_after("fedora/"));
        }
        if self.has("linux") {
            return Self::named("Linux", None);
        }
        if self.has("freebsd") {
            return Self::named("FreeBSD", None);
        }
        (None, None)
    }

    // "CrOS x86_64 14541.0.0": the release follows the architecture.
    fn chrome_os_version(&self) -> Option<String> {
        let start = self.lower.find("cros ")? + "cros ".len();
        let release = self.raw[start..].split_whitespace().nth(1)?;
        let release: String = release
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        (!release.is_empty()).then_some(release)
    }

    fn device(&self, os: Option<&str>) -> (Option<String>, Option<String>, Option<String>) {
        let owned = |s: &str| Some(s.to_string());

        if self.has("ipad") {
            return (owned("Apple"), owned("iPad"), owned("tablet"));
        }
        if self.has("iphone") {
            return (owned("Apple"), owned("iPhone"), owned("mobile"));
        }
        if self.has("ipod") {
            return (owned("Apple"), owned("iPod"), owned("mobile"));
        }
        if self.has_any(&["smart-tv", "smarttv", "tizen", "web0s", "webos", "appletv", "crkey"]) {
            return (None, None, owned("smarttv"));
        }
        if self.has_any(&["playstation", "xbox", "nintendo"]) {
            return (None, None, owned("console"));
        }
        if os == Some("Android") {
            let model = self.android_model();
            let vendor = model.as_deref().and_then(android_vendor).map(str::to_string);
            let kind = if self.has("mobile") { "mobile" } else { "tablet" };
            return (vendor, model, owned(kind));
        }
        if self.has("macintosh") {
            return (owned("Apple"), owned("Macintosh"), owned("desktop"));
        }
        if os == Some("Windows Phone") || self.has_any(&["mobile", "phone"]) {
            return (None, None, owned("mobile"));
        }
        if self.has("tablet") {
            return (None, None, owned("tablet"));
        }
        if matches!(
            os,
            Some("Windows" | "Linux" | "Ubuntu" | "Fedora" | "FreeBSD" | "Chrome OS" | "Mac OS")
        ) {
            return (None, None, owned("desktop"));
        }
        (None, None, None)
    }

    // "(Linux; Android 14; Pixel 8 Build/UQ1A...)": the segment after the Android one.
    fn android_model(&self) -> Option<String> {
        let open = self.raw.find('(')?;
        let close = self.raw[open..].find(')').map(|i| open + i)?;
        let segments: Vec<&str> = self.raw[open + 1..close].split(';').map(str::trim).collect();

        let android_idx = segments
            .iter()
            .position(|s| s.to_ascii_lowercase().starts_with("android"))?;
        let candidate = segments
            .iter()
            .skip(android_idx + 1)
            .find(|s| !s.is_empty() && !s.eq_ignore_ascii_case("wv") && !is_locale(s))?;

        let model = match candidate.find(" Build/") {
            Some(idx) => &candidate[..idx],
            None => candidate,
        };
        let model = model.trim();
        (!model.is_empty()).then(|| model.to_string())
    }

    fn cpu(&self) -> Option<String> {
        let arch = if self.has_any(&["x86_64", "x64", "win64", "wow64", "amd64"]) {
            "amd64"
        } else if self.has_any(&["arm64", "aarch64"]) {
            "arm64"
        } else if self.has("armv7") || self.has("armv6") {
            "arm"
        } else if self.has_any(&["i686", "i386", "x86"]) {
            "ia32"
        } else {
            return None;
        };
        Some(arch.to_string())
    }
}

// Older Android builds put a locale such as "en-us" before the model.
fn is_locale(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'-'
        && bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[3..].iter().all(u8::is_ascii_alphabetic)
}

fn windows_release(nt: &str) -> String {
    match nt {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.1" | "5.2" => "XP",
        "5.0" => "2000",
        other => other,
    }
    .to_string()
}

fn android_vendor(model: &str) -> Option<&'static str> {
    let lower = model.to_ascii_lowercase();
    let vendor = if lower.starts_with("sm-") || lower.starts_with("gt-") || lower.contains("galaxy") {
        "Samsung"
    } else if lower.starts_with("pixel") || lower.starts_with("nexus") {
        "Google"
    } else if lower.starts_with("redmi") || lower.starts_with("mi ") || lower.starts_with("poco") {
        "Xiaomi"
    } else if lower.starts_with("moto") {
        "Motorola"
    } else if lower.starts_with("oneplus") {
        "OnePlus"
    } else if lower.starts_with("huawei") {
        "Huawei"
    } else {
        return None;
    };
    Some(vendor)
}
