pub mod keep_alive;
pub mod nutrition;

pub use keep_alive::KeepAliveService;
pub use nutrition::NutritionHandler;
