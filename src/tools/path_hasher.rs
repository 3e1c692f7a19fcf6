/// 快取鍵長度（十六進位字元），取 BLAKE3 摘要的前 16 位元組
const KEY_HEX_LEN: usize = 32;

/// 將路徑雜湊為固定長度的快取鍵（32 個小寫十六進位字元）
///
/// 輸入為路徑的原始位元組，非 UTF-8 路徑不會彼此碰撞；不讀取檔案內容。
/// 空輸入回傳 `None` 表示無法快取。
#[must_use]
pub fn hash_path(path: &[u8]) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let hex = blake3::hash(path).to_hex();
    Some(hex[..KEY_HEX_LEN].to_string())
}
