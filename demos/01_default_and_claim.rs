/// a borrower stops paying and the lender claims the collateral at expiry
use nft_lending_rs::chrono::{Duration, TimeZone, Utc};
use nft_lending_rs::{
    CollateralAsset, Currency, InMemoryCustody, LendingEngine, LoanTerms, Money, Rate,
    SafeTimeProvider, TimeSource, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let control = time.test_control().unwrap();

    let admin = Uuid::new_v4();
    let operator = Uuid::new_v4();
    let custodian = Uuid::new_v4();
    let borrower = Uuid::new_v4();
    let lender = Uuid::new_v4();

    let nft = CollateralAsset {
        contract: Uuid::new_v4(),
        token_id: 7,
    };
    let mut custody = InMemoryCustody::new();
    custody.register_asset(nft, borrower);
    custody.deposit(Currency::Native, lender, Money::from_units(5_000));
    custody.deposit(Currency::Native, borrower, Money::from_units(5_000));

    let mut engine = LendingEngine::new(custody, admin, operator, custodian);

    let terms = LoanTerms {
        loan_amount: Money::from_units(1000),
        assets_value: Money::from_units(2000),
        interest_rate: Rate::from_scaled(200),
        installment_frequency: 7,
        nr_of_installments: 4,
        currency: Currency::Native,
    };
    let loan_id = engine.create_loan(&borrower, terms, vec![nft], &time)?;
    engine.approve_loan(&lender, loan_id, Money::from_units(1000), &time)?;

    // one installment of (1000 + 200) / 4 = 300, then silence
    engine.pay_loan(&borrower, loan_id, Money::from_units(300), &time)?;

    // the lender grants a week of grace, forgiving one installment with it
    engine.extend_loan(&lender, loan_id, 7, &time)?;

    // the deadline passes without further payment
    control.advance(Duration::days(60));
    engine.withdraw_items(&lender, loan_id, &time)?;

    println!("loan ended as {:?}", engine.status(loan_id)?);
    println!(
        "nft now belongs to the lender: {}",
        engine.gateway().owner_of(&nft) == Some(lender)
    );

    Ok(())
}
