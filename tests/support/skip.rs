/// Skip a test if AWS credentials or the test IAM user are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() {
            eprintln!("SKIPPED: AWS_ACCESS_KEY_ID not set");
            return;
        }
        if std::env::var("ROTATOR_TEST_IAM_USER").is_err() {
            eprintln!("SKIPPED: ROTATOR_TEST_IAM_USER not set (set to a disposable IAM user)");
            return;
        }
    };
}
