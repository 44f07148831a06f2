use indoc::indoc;

// Help text template with placeholder
pub const HELP_TEMPLATE: &str = indoc! {r#"
    Examples:
      # Appending a pickle with three fields
      %BINARY_NAME% data.pkl append int:7 string:hello data:deadbeef

      # Listing the pickles in a file
      %BINARY_NAME% data.pkl list

      # Decoding the first pickle
      %BINARY_NAME% data.pkl decode 0 int string data

      # Reading raw bytes whose length is not stored
      %BINARY_NAME% data.pkl decode 1 bytes:4

      # Rejecting pickles over 1 MB while scanning
      %BINARY_NAME% data.pkl --max-size 1mb info

    Field kinds:
      bool, int, long, u16, u32, i64, u64, f32, f64, string, string16, data, bytes
      (`data` and `bytes` values are hex encoded)
"#};
