pub mod translator;

pub use translator::BanglaKoreanTranslator;
