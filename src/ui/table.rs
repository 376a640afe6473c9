use tabled::{settings::Style, Table, Tabled};
use crate::user::User;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

pub fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return String::new();
    }

    let rows: Vec<UserRow> = users.iter().map(UserRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
