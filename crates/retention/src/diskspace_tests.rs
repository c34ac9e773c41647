use super::*;

#[test]
fn parses_standard_df_output() {
    let sample = "Filesystem     1024-blocks     Used Available Capacity Mounted on\n\
                   /dev/sda1        10485760  8388608   2097152      80% /\n";
    let free = parse_df_output(sample).unwrap();
    assert_eq!(free, 20);
}

#[test]
fn rejects_output_with_no_data_line() {
    assert!(parse_df_output("Filesystem only header\n").is_err());
}

#[test]
fn statvfs_source_reads_real_filesystem() {
    let pct = StatvfsSource.free_pct(std::path::Path::new("/tmp")).unwrap();
    assert!(pct <= 100);
}
