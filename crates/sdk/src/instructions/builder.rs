use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Builder for constructing token sale program instructions
pub struct SaleInstructionBuilder {
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl SaleInstructionBuilder {
    pub fn with_program_id(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add a writable signer account
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, true));
        self
    }

    /// Add a signer the program only reads
    pub fn add_readonly_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, true));
        self
    }

    /// Add a writable non-signer account
    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, false));
        self
    }

    /// Add a readonly account
    pub fn add_readonly(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    /// Set the instruction data
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Build the final instruction
    pub fn build(self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_flags() {
        let program_id = Pubkey::new_unique();
        let keys: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();

        let ix = SaleInstructionBuilder::with_program_id(program_id)
            .add_signer(keys[0])
            .add_readonly_signer(keys[1])
            .add_writable(keys[2])
            .add_readonly(keys[3])
            .with_data(vec![7])
            .build();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data, vec![7]);
        let flags: Vec<(bool, bool)> = ix
            .accounts
            .iter()
            .map(|meta| (meta.is_signer, meta.is_writable))
            .collect();
        assert_eq!(
            flags,
            vec![(true, true), (true, false), (false, true), (false, false)]
        );
    }
}
