pub mod libfiszki;
