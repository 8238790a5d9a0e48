//! User-facing reply texts
//!
//! 所有回复文案集中在这里，保持对话口吻一致。
//! Formatting helpers are pure functions.

use crate::session::{ORDER_POINTS, RESERVATION_POINTS};

pub const GREETING: &str =
    "Привет! Я помогу оформить заказ или забронировать столик в вашем ресторане.";
pub const CHOOSE_CATEGORY: &str = "Выберите категорию:";
pub const EMPTY_CART: &str = "Корзина пуста. Добавьте блюда через меню.";
pub const ASK_DATE: &str =
    "Введите дату бронирования в формате YYYY-MM-DD (пример: 2025-12-31):";
pub const ASK_TIME: &str = "Введите время бронирования (HH:MM):";
pub const ASK_PEOPLE: &str = "Введите количество человек:";
pub const HELP: &str = "/start — запустить бота\n/checkout — оформить текущую позицию в корзине\n/admin_orders — (админ) список заказов и бронирований.";
pub const FALLBACK: &str =
    "Используйте меню: /start или кнопки. Для оформления заказа используйте /checkout.";
pub const NO_PERMISSION: &str = "Недостаточно прав.";
pub const SERVICE_UNAVAILABLE: &str = "Сервис временно недоступен. Попробуйте позже.";

pub fn category_header(category: &str) -> String {
    format!("Категория: {category}")
}

pub fn item_button_label(name: &str, price: i64) -> String {
    format!("{name} — {price}₽")
}

pub fn added_to_cart(name: &str, price: i64) -> String {
    format!(
        "Добавлено в корзину: {name} — {price}₽. Нажмите ещё раз на «🍽 Меню» чтобы добавить новое или /checkout для оформления."
    )
}

pub fn order_created(order_id: i64) -> String {
    format!("Заказ #{order_id} создан. Спасибо! Вы получили +{ORDER_POINTS} баллов.")
}

pub fn reservation_created(reservation_id: i64, date: &str, time: &str, people: i64) -> String {
    format!(
        "Бронирование #{reservation_id} создано: {date} {time}, {people} чел. Спасибо! +{RESERVATION_POINTS} баллов."
    )
}

pub fn points_balance(points: i64) -> String {
    format!("У вас {points} баллов.")
}
