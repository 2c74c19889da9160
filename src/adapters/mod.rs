// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod supabase;
pub mod telegram;

pub use supabase::SupabaseClient;
pub use telegram::TelegramClient;
