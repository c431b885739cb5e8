pub mod api;
pub mod pytanie;
pub mod sesja;
pub mod wynik;
