//! Client-facing texts and keyboards of the estimate conversation.

use restdel_core::{Button, Keyboard};

pub const START: &str = "🎉 Добро пожаловать! Я ваш личный менеджер Rest Delivery. Опишите ваше мероприятие, и я подготовлю предложение по нашим правилам.\n\nЧтобы начать расчет сметы, отправьте /new";
pub const HELP: &str = "Я помогаю рассчитать смету на кейтеринг Rest Delivery.\n\n/new - новая смета\n/cancel - отменить текущий расчет\n/help - эта справка";
pub const NEW_REQUEST: &str = "📝 Опишите ваш запрос: количество гостей, дата, бюджет и особые пожелания.";
pub const ANALYZING: &str = "Анализирую информацию...";
pub const ANALYSIS_FAILED: &str = "❌ Не удалось проанализировать ваш запрос. Попробуйте описать его подробнее.";
pub const ASK_BUDGET: &str = "✅ Все основные параметры понятны. Подскажите, пожалуйста, какой у вас ориентировочный бюджет?";
pub const BUDGET_DIGITS: &str = "Пожалуйста, укажите бюджет цифрами. Например: 35000";
pub const PROCESSING: &str = "🤖 Анализирую запрос и подбираю лучшее предложение...";
pub const PROPOSAL_FAILED: &str = "❌ Не удалось составить предложение. Попробуйте еще раз.";
pub const EDIT_PROMPT: &str = "✏️ Напишите, что бы вы хотели изменить. Например: «Замените рыбу на курицу и добавьте больше вегетарианских закусок».";
pub const APPLYING_EDITS: &str = "🔄 Вношу правки и пересчитываю предложение...";
pub const EDITS_FAILED: &str = "❌ Не удалось обновить предложение. Пожалуйста, попробуйте сформулировать правки иначе.";
pub const ACCEPTING: &str = "✅ Отлично! Фиксируем договоренности и готовлю финальную смету...";
pub const QUOTE_READY: &str = "🎉 Ваше коммерческое предложение готово!";
pub const QUOTE_FAILED: &str = "❌ Произошла ошибка при создании сметы. Попробуйте еще раз.";
pub const CANCELLED: &str = "❌ Операция отменена.";
pub const CHOOSE_ACTION: &str = "Выберите действие кнопками под предложением.";
pub const STALE_PROPOSAL: &str = "Это предложение уже неактуально. Чтобы начать заново, отправьте /new";
pub const IDLE_HINT: &str = "Чтобы рассчитать смету, отправьте /new";

pub const CB_ACCEPT: &str = "accept_proposal";
pub const CB_EDIT: &str = "edit_proposal";
pub const CB_CANCEL: &str = "cancel";
pub const CB_NEW_QUOTE: &str = "new_quote_final";

pub fn proposal_keyboard() -> Keyboard {
    Keyboard::new()
        .button(Button::callback("✅ Все верно, создаем смету!", CB_ACCEPT))
        .button(Button::callback("✏️ Внести правки в меню", CB_EDIT))
        .button(Button::callback("❌ Отменить", CB_CANCEL))
}

pub fn new_quote_keyboard() -> Keyboard {
    Keyboard::new().button(Button::callback("📊 Создать новую смету", CB_NEW_QUOTE))
}

pub fn quote_caption(order_number: &str, total_cost: u64) -> String {
    format!(
        "{}\nНомер заказа: {}\nИтого к оплате: {} руб.",
        QUOTE_READY,
        order_number,
        estimate::group_thousands(total_cost as i64)
    )
}
