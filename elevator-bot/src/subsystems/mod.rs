pub mod elevator;
