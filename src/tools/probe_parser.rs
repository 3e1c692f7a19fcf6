//! ffprobe `csv=p=0` 單行輸出的解析
//!
//! 每種輸出形狀各有一個解析函式，缺值時回傳 `None`，預設值由呼叫端決定。

/// 未回報位元深度時的預設值
pub const DEFAULT_BIT_DEPTH: u32 = 8;

/// 無法取得幀率時的預設值
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamLine {
    pub width: u32,
    pub height: u32,
    /// 串流層級的長度，`N/A` 或缺值時為 `None`
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLine {
    /// 已轉為大寫的編碼名稱
    pub codec_name: String,
    pub bit_depth: u32,
}

fn first_line(output: &str) -> &str {
    output.lines().next().unwrap_or("").trim()
}

/// 解析 `width,height[,duration]`，至少需要寬與高
#[must_use]
pub fn parse_stream_line(output: &str) -> Option<StreamLine> {
    let mut fields = first_line(output).split(',').map(str::trim);

    let width = fields.next()?.parse::<u32>().ok()?;
    let height = fields.next()?.parse::<u32>().ok()?;
    let duration = fields.next().and_then(|d| d.parse::<f64>().ok());

    Some(StreamLine {
        width,
        height,
        duration,
    })
}

/// 解析單一浮點數（容器層級的長度）
#[must_use]
pub fn parse_duration(output: &str) -> Option<f64> {
    first_line(output)
        .split(',')
        .next()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite())
}

/// 解析 `codec_name[,bits_per_raw_sample]`
///
/// 位元深度缺值、非數字或不大於零時使用 [`DEFAULT_BIT_DEPTH`]。
#[must_use]
pub fn parse_codec_line(output: &str) -> Option<CodecLine> {
    let line = first_line(output);
    let (codec, depth) = match line.split_once(',') {
        Some((codec, depth)) => (codec.trim(), Some(depth.trim())),
        None => (line, None),
    };

    if codec.is_empty() {
        return None;
    }

    let bit_depth = depth
        .and_then(|d| d.parse::<i64>().ok())
        .filter(|d| *d > 0)
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(DEFAULT_BIT_DEPTH);

    Some(CodecLine {
        codec_name: codec.to_uppercase(),
        bit_depth,
    })
}

/// 解析幀率字串（例如 "30/1"、"30000/1001" 或 "25"）
///
/// 先嘗試分數形式（分母需大於零），再嘗試單一數字。含 `/` 但分母無效時
/// （例如 "30/0"）整體視為無法解析，不會退回只讀分子。
#[must_use]
pub fn parse_frame_rate(output: &str) -> Option<f64> {
    let rate = first_line(output);
    let fps = if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.trim().parse().ok()?;
        let den: f64 = den_str.trim().parse().ok()?;
        if den <= 0.0 {
            return None;
        }
        num / den
    } else {
        rate.parse().ok()?
    };

    (fps.is_finite() && fps > 0.0).then_some(fps)
}
