use crate::domain::OrderStatus;

#[derive(Debug, Clone)]
pub enum OrderAction {
    SetStatus(OrderStatus),
    MarkPaid,
}
