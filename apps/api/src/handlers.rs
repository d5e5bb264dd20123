pub mod forms;
pub mod health;
pub mod security;
pub mod submissions;

#[cfg(test)]
mod tests;
