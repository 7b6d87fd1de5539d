//! Instruction batches of a launch
//!
//! The three batches are built from each other: the associated account batch
//! needs the mint batch, and the mint-to batch needs the associated account
//! batch, so they cannot be assembled out of order.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account,
};
use spl_token_2022::extension::metadata_pointer;

use crate::error::{BatchKind, LaunchError, LaunchResult};
use crate::metadata::TokenMetadata;
use crate::sizing::MintAccountPlan;
use crate::types::MINT_DECIMALS;

/// Ordered instructions submitted as one transaction
#[derive(Debug, Clone)]
pub struct TransactionBatch {
    kind: BatchKind,
    instructions: Vec<Instruction>,
}

impl TransactionBatch {
    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}

/// Batch A: mint account creation and initialisation
#[derive(Debug, Clone)]
pub struct MintBatch {
    batch: TransactionBatch,
    mint: Pubkey,
}

impl MintBatch {
    pub fn batch(&self) -> &TransactionBatch {
        &self.batch
    }

    pub fn mint(&self) -> Pubkey {
        self.mint
    }
}

/// Batch B: associated holding account creation
#[derive(Debug, Clone)]
pub struct AssociatedAccountBatch {
    batch: TransactionBatch,
    mint: Pubkey,
    associated_account: Pubkey,
}

impl AssociatedAccountBatch {
    pub fn batch(&self) -> &TransactionBatch {
        &self.batch
    }

    pub fn mint(&self) -> Pubkey {
        self.mint
    }

    pub fn associated_account(&self) -> Pubkey {
        self.associated_account
    }
}

/// Batch C: initial supply issuance
#[derive(Debug, Clone)]
pub struct MintToBatch {
    batch: TransactionBatch,
    amount: u64,
}

impl MintToBatch {
    pub fn batch(&self) -> &TransactionBatch {
        &self.batch
    }

    /// Base units minted
    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Derive the associated Token-2022 account of `owner` for `mint`
pub fn get_token_2022_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::ID)
}

/// Builds launch batches for a single wallet acting as payer, mint authority
/// and update authority
pub struct MintTransactionBuilder {
    authority: Pubkey,
    token_program: Pubkey,
}

impl MintTransactionBuilder {
    pub fn new(authority: Pubkey) -> Self {
        Self {
            authority,
            token_program: spl_token_2022::ID,
        }
    }

    pub fn authority(&self) -> Pubkey {
        self.authority
    }

    /// Create account, initialise metadata pointer, initialise mint,
    /// initialise metadata. Each step needs the account state left by the one before.
    pub fn mint_batch(
        &self,
        plan: &MintAccountPlan,
        metadata: &TokenMetadata,
    ) -> LaunchResult<MintBatch> {
        let mint = plan.mint();
        let build_err = |e: solana_sdk::program_error::ProgramError| LaunchError::InstructionBuild {
            batch: BatchKind::Mint,
            reason: e.to_string(),
        };

        if metadata.mint() != mint {
            return Err(LaunchError::InstructionBuild {
                batch: BatchKind::Mint,
                reason: format!("metadata describes mint {}, plan creates {}", metadata.mint(), mint),
            });
        }

        if metadata.update_authority() != Some(self.authority) {
            return Err(LaunchError::InstructionBuild {
                batch: BatchKind::Mint,
                reason: "metadata update authority must be the mint authority".to_string(),
            });
        }

        let create_account = system_instruction::create_account(
            &self.authority,
            &mint,
            plan.rent_exempt_lamports,
            plan.sizing.account_len as u64,
            &self.token_program,
        );

        let init_pointer = metadata_pointer::instruction::initialize(
            &self.token_program,
            &mint,
            Some(self.authority),
            Some(mint),
        )
        .map_err(build_err)?;

        let init_mint = spl_token_2022::instruction::initialize_mint(
            &self.token_program,
            &mint,
            &self.authority,
            None,
            MINT_DECIMALS,
        )
        .map_err(build_err)?;

        let init_metadata = spl_token_metadata_interface::instruction::initialize(
            &self.token_program,
            &mint,
            &self.authority,
            &mint,
            &self.authority,
            metadata.name().to_string(),
            metadata.symbol().to_string(),
            metadata.uri().to_string(),
        );

        Ok(MintBatch {
            batch: TransactionBatch {
                kind: BatchKind::Mint,
                instructions: vec![create_account, init_pointer, init_mint, init_metadata],
            },
            mint,
        })
    }

    /// Create the authority's associated account for the mint of `mint_batch`
    pub fn associated_account_batch(&self, mint_batch: &MintBatch) -> AssociatedAccountBatch {
        let mint = mint_batch.mint();
        let associated_account =
            get_associated_token_address_with_program_id(&self.authority, &mint, &self.token_program);

        let create_ata = create_associated_token_account(
            &self.authority,
            &self.authority,
            &mint,
            &self.token_program,
        );

        AssociatedAccountBatch {
            batch: TransactionBatch {
                kind: BatchKind::AssociatedAccount,
                instructions: vec![create_ata],
            },
            mint,
            associated_account,
        }
    }

    /// Mint `amount` base units into the account created by `account_batch`
    pub fn mint_to_batch(
        &self,
        account_batch: &AssociatedAccountBatch,
        amount: u64,
    ) -> LaunchResult<MintToBatch> {
        let mint_to = spl_token_2022::instruction::mint_to(
            &self.token_program,
            &account_batch.mint(),
            &account_batch.associated_account(),
            &self.authority,
            &[],
            amount,
        )
        .map_err(|e| LaunchError::InstructionBuild {
            batch: BatchKind::MintTo,
            reason: e.to_string(),
        })?;

        Ok(MintToBatch {
            batch: TransactionBatch {
                kind: BatchKind::MintTo,
                instructions: vec![mint_to],
            },
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{MintKeypair, MintSizing};
    use solana_sdk::system_program;
    use spl_token_2022::instruction::TokenInstruction;
    use spl_token_metadata_interface::instruction::TokenMetadataInstruction;

    fn plan_and_metadata(authority: Pubkey) -> (MintAccountPlan, TokenMetadata) {
        let mint_keypair = MintKeypair::generate();
        let metadata = TokenMetadata::new(
            authority,
            mint_keypair.pubkey(),
            "Demo",
            "DMO",
            "https://example.com/raw/metadata.json",
        )
        .unwrap();
        let plan = MintAccountPlan {
            mint_keypair,
            sizing: MintSizing {
                account_len: 234,
                metadata_len: 150,
            },
            rent_exempt_lamports: 3_563_520,
        };
        (plan, metadata)
    }

    #[test]
    fn test_mint_batch_order_and_layout() {
        let authority = Pubkey::new_unique();
        let builder = MintTransactionBuilder::new(authority);
        let (plan, metadata) = plan_and_metadata(authority);
        let mint = plan.mint();

        let batch = builder.mint_batch(&plan, &metadata).unwrap();
        let ixs = batch.batch().instructions();
        assert_eq!(batch.batch().kind(), BatchKind::Mint);
        assert_eq!(ixs.len(), 4);

        // create_account: u32 tag, u64 lamports, u64 space, owner
        assert_eq!(ixs[0].program_id, system_program::id());
        assert_eq!(ixs[0].accounts[0].pubkey, authority);
        assert_eq!(ixs[0].accounts[1].pubkey, mint);
        assert!(ixs[0].accounts[1].is_signer);
        let data = &ixs[0].data;
        assert_eq!(&data[0..4], &0u32.to_le_bytes());
        assert_eq!(&data[4..12], &3_563_520u64.to_le_bytes());
        assert_eq!(&data[12..20], &234u64.to_le_bytes());
        assert_eq!(&data[20..52], spl_token_2022::ID.as_ref());

        assert_eq!(ixs[1].program_id, spl_token_2022::ID);
        assert!(matches!(
            TokenInstruction::unpack(&ixs[1].data).unwrap(),
            TokenInstruction::MetadataPointerExtension
        ));

        match TokenInstruction::unpack(&ixs[2].data).unwrap() {
            TokenInstruction::InitializeMint {
                decimals,
                mint_authority,
                freeze_authority,
            } => {
                assert_eq!(decimals, 9);
                assert_eq!(mint_authority, authority);
                assert!(freeze_authority.is_none());
            }
            other => panic!("unexpected instruction: {:?}", other),
        }

        match TokenMetadataInstruction::unpack(&ixs[3].data).unwrap() {
            TokenMetadataInstruction::Initialize(init) => {
                assert_eq!(init.name, "Demo");
                assert_eq!(init.symbol, "DMO     ");
                assert_eq!(init.uri, "https://example.com/raw/metadata.json");
            }
            other => panic!("unexpected instruction: {:?}", other),
        }
        assert_eq!(ixs[3].program_id, spl_token_2022::ID);
    }

    #[test]
    fn test_mint_batch_rejects_foreign_metadata() {
        let authority = Pubkey::new_unique();
        let builder = MintTransactionBuilder::new(authority);
        let (plan, _) = plan_and_metadata(authority);
        let foreign = TokenMetadata::new(authority, Pubkey::new_unique(), "Demo", "DMO", "u").unwrap();

        let err = builder.mint_batch(&plan, &foreign).unwrap_err();
        assert_eq!(err.batch(), Some(BatchKind::Mint));
    }

    #[test]
    fn test_mint_batch_rejects_other_update_authority() {
        let authority = Pubkey::new_unique();
        let builder = MintTransactionBuilder::new(authority);
        let (plan, _) = plan_and_metadata(authority);
        let metadata =
            TokenMetadata::new(Pubkey::new_unique(), plan.mint(), "Demo", "DMO", "u").unwrap();

        let err = builder.mint_batch(&plan, &metadata).unwrap_err();
        assert!(matches!(err, LaunchError::InstructionBuild { .. }));
    }

    #[test]
    fn test_associated_account_batch() {
        let authority = Pubkey::new_unique();
        let builder = MintTransactionBuilder::new(authority);
        let (plan, metadata) = plan_and_metadata(authority);
        let mint_batch = builder.mint_batch(&plan, &metadata).unwrap();

        let batch = builder.associated_account_batch(&mint_batch);
        let expected = get_token_2022_account(&authority, &plan.mint());
        assert_eq!(batch.associated_account(), expected);
        assert_eq!(batch.batch().kind(), BatchKind::AssociatedAccount);

        let ixs = batch.batch().instructions();
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[0].accounts[1].pubkey, expected);
        assert_eq!(ixs[0].accounts[3].pubkey, plan.mint());
        assert_eq!(ixs[0].accounts[5].pubkey, spl_token_2022::ID);
    }

    #[test]
    fn test_mint_to_batch_amount() {
        let authority = Pubkey::new_unique();
        let builder = MintTransactionBuilder::new(authority);
        let (plan, metadata) = plan_and_metadata(authority);
        let mint_batch = builder.mint_batch(&plan, &metadata).unwrap();
        let account_batch = builder.associated_account_batch(&mint_batch);

        let batch = builder
            .mint_to_batch(&account_batch, 1_000 * 1_000_000_000)
            .unwrap();
        assert_eq!(batch.amount(), 1_000_000_000_000);

        let ix = &batch.batch().instructions()[0];
        assert_eq!(ix.accounts[0].pubkey, plan.mint());
        assert_eq!(ix.accounts[1].pubkey, account_batch.associated_account());
        assert_eq!(ix.accounts[2].pubkey, authority);
        assert!(ix.accounts[2].is_signer);
        match TokenInstruction::unpack(&ix.data).unwrap() {
            TokenInstruction::MintTo { amount } => assert_eq!(amount, 1_000_000_000_000),
            other => panic!("unexpected instruction: {:?}", other),
        }
    }
}
