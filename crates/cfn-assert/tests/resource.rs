//! Resource matcher behavior against a synthesized website stack
mod common;

use cfn_assert::error::Failure;
use cfn_assert::kinds::S3Bucket;
use cfn_assert::{template, Pattern, RemovalPolicy};
use pretty_assertions::assert_eq;

#[test]
fn counts_by_property() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    template.s3_bucket().count_is(2)?;
    template.s3_bucket().with_property("BucketName", "bucket").count_is(2)?;
    template.s3_bucket().with_property("BucketName", "website").count_is(1)?;
    template.s3_bucket().with_property("BucketName", "images").does_not_exist()?;
    template.resource("AWS::S3::Bucket").with_property_present("CorsConfiguration").exists()?;

    Ok(())
}

#[test]
fn identity_needs_a_unique_match() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    let err = template.s3_bucket().id().unwrap_err();
    assert_eq!(
        err.failure,
        Failure::NotUnique {
            ids: vec!["WebsiteBucket75C24D94".into(), "AssetsBucket5CB76180".into()]
        }
    );

    let err = template.s3_bucket().with_bucket_name("images").id().unwrap_err();
    assert_eq!(err.failure, Failure::NotFound);

    assert_eq!(template.s3_bucket().with_partial_key("assets").id()?, "AssetsBucket5CB76180");
    Ok(())
}

#[test]
fn refining_after_an_assertion() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    let bucket = template.s3_bucket();
    bucket.exists()?;
    assert!(bucket.id().is_err());

    let bucket = bucket.with_removal_policy(RemovalPolicy::Retain);
    assert_eq!(bucket.id()?, "AssetsBucket5CB76180");
    Ok(())
}

#[test]
fn forked_matchers_are_independent() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    let buckets = template.s3_bucket();
    let website = buckets.clone().with_website_hosting(Default::default());

    assert_eq!(buckets.count(), 2);
    assert_eq!(website.count(), 1);
    Ok(())
}

#[test]
fn metadata_and_root_properties() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    template
        .resource("AWS::CDK::Metadata")
        .with_metadata("aws:cdk:path", "CDKMetadata")
        .with_root_property_present("Properties")
        .exists()?;
    template
        .resource("AWS::CDK::Metadata")
        .with_metadata_present("aws:asset:path")
        .does_not_exist()?;

    Ok(())
}

#[test]
fn definition_and_reference() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;
    let table = template.dynamodb_table().with_table_name("visits");

    let definition = table.definition()?;
    assert_eq!(definition["Id"], "VisitsTable1D3C42A5");
    assert_eq!(definition["Properties"]["BillingMode"], "PAY_PER_REQUEST");
    assert_eq!(table.to_json()?, definition);

    assert!(table.reference()?.matches(&serde_json::json!({ "Ref": "VisitsTable1D3C42A5" })));
    Ok(())
}

#[test]
fn dependencies() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;
    let role = template.iam_role().assumable_by_lambda();
    let policy = template.iam_policy().used_by_role(&role)?;

    template
        .lambda_function()
        .depends_on(&role)?
        .depends_on(&policy)?
        .exists()?;

    let table = template.dynamodb_table();
    template.lambda_function().depends_on(&table)?.does_not_exist()?;

    Ok(())
}

#[test]
fn tags() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;
    let bucket = template.s3_bucket().with_partial_key("website");

    bucket
        .has_tag("Team", Some("web"))?
        .has_tag("aws-cdk:auto-delete-objects", None)?
        .exists()?;

    let err = bucket.has_tag("Team", Some("api")).unwrap_err();
    assert_eq!(err.failure.to_string(), r#"Tag Team has value "web", expected "api""#);

    let err = bucket.has_tag("Owner", None).unwrap_err();
    assert_eq!(err.failure.to_string(), "There is no such tag like Owner");
    Ok(())
}

#[test]
fn typed_and_untyped_matchers_agree() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    let typed = template.of::<S3Bucket>().with_bucket_name("assets");
    let untyped = template
        .removable_resource("AWS::S3::Bucket")
        .with_property("BucketName", Pattern::string_like("^assets-")?);

    assert_eq!(typed.id()?, untyped.id()?);
    Ok(())
}

#[test]
fn failures_explain_what_was_searched_for() {
    common::init_tracing();
    let template = template!(
        r#"{ "Resources": { "Foo": { "Type": "Test::Kind", "Properties": { "Name": "foo" } } } }"#
    );

    let err = template
        .resource("Test::Kind")
        .with_property("Name", "bar")
        .id()
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r###"
    Resource not found!
    Info: {
      "config": {
        "$objectLike": {
          "Properties": {
            "$objectLike": {
              "Name": {
                "$partial": "bar"
              }
            }
          }
        }
      },
      "similarType": {
        "Foo": {
          "Type": "Test::Kind",
          "Properties": {
            "Name": "foo"
          }
        }
      }
    }
    "###);
}

#[test]
fn count_mismatch_reports_both_counts() -> anyhow::Result<()> {
    let template = common::fixture("website.json")?;

    let err = template.lambda_function().count_is(2).unwrap_err();
    assert_eq!(
        err.failure,
        Failure::CountMismatch {
            expected: 2,
            actual: 1
        }
    );
    assert!(err
        .to_string()
        .starts_with("Resource count does not match! Expected 2 but found 1\nInfo: {"));

    let err = template.lambda_function().does_not_exist().unwrap_err();
    assert_eq!(err.failure.to_string(), "Resource exists!");
    Ok(())
}
