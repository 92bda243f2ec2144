//! Fixed texts the sample bot sends.

pub const WELCOME_TEXT: &str = "SampleBot へようこそ！";
pub const NAME_PROMPT_TEXT: &str = "ハンドルネームを教えてください。";
pub const NAME_RETRY_TEXT: &str = "ハンドルネームは3文字以上で入力してください。";

pub fn greeting(handle_name: &str) -> String {
    format!("こんにちは、{}さん！", handle_name)
}
