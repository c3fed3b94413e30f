//! Fixed user-facing strings.

/// Label of the reply-keyboard button that starts the flow.
pub const TRIGGER_BUTTON: &str = "🧾 Получить сертификат";

pub const START_PROMPT: &str = "Нажмите кнопку ниже:";
pub const PING_REPLY: &str = "✅ Бот активен и работает!";
pub const ASK_SUM: &str = "Введите номинал:";
pub const ASK_NUMBER: &str = "Введите номер сертификата:";
pub const CANCELLED: &str = "Операция отменена.";
pub const DATE_OUT_OF_RANGE: &str = "Ошибка: не удалось вычислить срок действия сертификата.";

pub fn template_open_failed(reason: &str) -> String {
    format!("Ошибка при открытии шаблона: {reason}")
}

pub fn template_too_short() -> String {
    "Ошибка: в шаблоне должно быть минимум 2 страницы.".to_string()
}

pub fn compose_failed(reason: &str) -> String {
    format!("Ошибка при заполнении шаблона: {reason}")
}

pub fn save_failed(reason: &str) -> String {
    format!("Ошибка при сохранении PDF: {reason}")
}

pub fn delivery_failed(reason: &str) -> String {
    format!("Ошибка при отправке PDF: {reason}")
}

pub fn issued(filename: &str) -> String {
    format!("✅ Сертификат готов: {filename}")
}
