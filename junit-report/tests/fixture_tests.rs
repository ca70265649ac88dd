// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use junit_report::{NonSuccessKind, Report, TestcaseStatus};
use pretty_assertions::assert_eq;
use std::{fs::File, io::BufReader, path::Path, time::Duration};

fn read_fixture(name: &str) -> Report {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let f = File::open(&path).expect("opening fixture succeeds");
    Report::deserialize(BufReader::new(f)).expect("fixture parses")
}

#[test]
fn connected_android_test() {
    let report = read_fixture("connected_android_test.xml");

    assert_eq!(
        (report.tests, report.skipped, report.failures, report.errors),
        (6, 1, 1, 0)
    );
    assert_eq!(report.time, Some(Duration::from_millis(84_250)));

    let statuses: Vec<_> = report
        .testcases()
        .map(|testcase| (testcase.name.as_str(), testcase.is_passed()))
        .collect();
    assert_eq!(
        statuses,
        [
            ("redeemViaPharmacyDelivery", true),
            ("redeemViaLocalPharmacy", true),
            ("redeemWithoutNetwork", false),
            ("redeemExpiredPrescription", false),
            ("redeemSelfPayer", true),
            ("redeemDirectAssignment", true),
        ]
    );

    let failed = report
        .testcases()
        .find(|testcase| testcase.name == "redeemWithoutNetwork")
        .expect("failed testcase present");
    match &failed.status {
        TestcaseStatus::NonSuccess {
            kind: NonSuccessKind::Failure,
            description: Some(description),
            ..
        } => {
            assert!(
                description.starts_with("androidx.test.espresso.NoMatchingViewException"),
                "unexpected description: {description}"
            );
        }
        other => panic!("expected a failure, found {other:?}"),
    }
}

#[test]
fn merged_report() {
    let report = read_fixture("merged_report.xml");

    assert_eq!(report.name.as_deref(), Some("espresso"));
    // skipped is absent on the root, so it is summed from the testsuites.
    assert_eq!(
        (report.tests, report.skipped, report.failures, report.errors),
        (5, 0, 0, 2)
    );
    assert_eq!(report.testsuites.len(), 2);

    let names: Vec<_> = report
        .testcases()
        .map(|testcase| testcase.name.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "acceptTermsOfUse",
            "setupPassword",
            "skipAnalytics",
            "toggleScreenshots",
            "changeProfileName",
        ]
    );

    let last = report.testcases().last().expect("testcases present");
    assert_eq!(
        last.status,
        TestcaseStatus::NonSuccess {
            kind: NonSuccessKind::Error,
            message: None,
            ty: Some("java.lang.RuntimeException".to_owned()),
            description: Some("Profile name \"Ärztin\" rejected".to_owned()),
        }
    );
}
