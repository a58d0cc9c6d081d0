// Form body for adding a new Todo
#[derive(Debug, serde::Deserialize)]
pub struct AddTodoSchema {
    #[serde(default)]
    pub todo: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct RegisterSchema {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct LoginSchema {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
